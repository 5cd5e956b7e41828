/// Форматирует число с разделителями тысяч (точками)
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Масштабирует число для карточки метрики: до тысячи как есть,
/// дальше "thousand", от миллиона "millions". Два знака после запятой.
///
/// `format_magnitude(1500.0, "R$")` -> `"R$ 1.50 thousand"`
pub fn format_magnitude(value: f64, prefix: &str) -> String {
    let mut value = value;
    for unit in ["", "thousand"] {
        if value < 1000.0 {
            return with_prefix(prefix, format!("{:.2} {}", value, unit));
        }
        value /= 1000.0;
    }
    with_prefix(prefix, format!("{:.2} millions", value))
}

fn with_prefix(prefix: &str, body: String) -> String {
    if prefix.is_empty() {
        body
    } else {
        format!("{} {}", prefix, body)
    }
}
