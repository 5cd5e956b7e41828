pub mod u508_fetch_sales;
