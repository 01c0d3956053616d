use chrono::Utc;
use rand::Rng;

/// `INV-{unix millis}-{4 random digits}`.
///
/// Not collision-proof: two numbers generated in the same millisecond share a
/// prefix and differ only by chance in the suffix. There is no retry.
pub fn generate_invoice_number() -> String {
    let suffix = rand::thread_rng().gen_range(0..10_000u16);
    format_invoice_number(Utc::now().timestamp_millis(), suffix)
}

fn format_invoice_number(unix_millis: i64, suffix: u16) -> String {
    format!("INV-{}-{:04}", unix_millis, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_suffix() {
        assert_eq!(format_invoice_number(1700000000123, 7), "INV-1700000000123-0007");
    }

    #[test]
    fn test_generated_shape() {
        let number = generate_invoice_number();
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "INV");
        assert!(parts[1].parse::<i64>().unwrap() > 0);
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }
}
