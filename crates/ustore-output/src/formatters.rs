use ustore_types::{FunctionStats, User, Users};

/// Compact JSON array of the collection, or nothing at all when it is empty.
pub fn format_users(users: &Users) -> Result<Vec<u8>, serde_json::Error> {
    if users.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::to_vec(users)
}

pub fn format_user(user: &User) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(user)
}

pub fn format_function_stats(stats: &[FunctionStats], indent: &str, limit: usize) -> Vec<String> {
    if stats.is_empty() {
        return vec![];
    }

    let name_width = stats
        .iter()
        .take(limit)
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max("FUNCTION".len());

    let mut lines = vec![format!(
        "{}{:<width$}  {:>5}  {:>10}  {:>10}  {:>10}  {:>10}",
        indent,
        "FUNCTION",
        "CALLS",
        "TOTAL",
        "AVG",
        "P90",
        "MAX",
        width = name_width
    )];

    for s in stats.iter().take(limit) {
        lines.push(format!(
            "{}{:<width$}  {:>5}  {:>10}  {:>10}  {:>10}  {:>10}",
            indent,
            s.name,
            s.calls,
            format_duration_us(s.total_us),
            format_duration_us(s.avg_us),
            format_duration_us(s.p90_us),
            format_duration_us(s.max_us),
            width = name_width
        ));
    }

    if stats.len() > limit {
        lines.push(format!("{}... and {} more", indent, stats.len() - limit));
    }

    lines
}

pub fn format_profiling(functions: &[FunctionStats]) -> String {
    if functions.is_empty() {
        return String::new();
    }
    let mut lines = vec!["TIMING".to_string()];
    lines.extend(format_function_stats(functions, "  ", usize::MAX));
    lines.join("\n")
}

fn format_duration_us(us: u64) -> String {
    if us >= 1_000_000 {
        format!("{:.2}s", us as f64 / 1_000_000.0)
    } else if us >= 1_000 {
        format!("{:.2}ms", us as f64 / 1_000.0)
    } else {
        format!("{}µs", us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection_formats_to_nothing() {
        assert!(format_users(&Users::new()).unwrap().is_empty());
    }

    #[test]
    fn test_collection_formats_as_compact_array() {
        let users = vec![User::new("1", "a@b.com", 30), User::new("2", "c@d.com", 40)];
        assert_eq!(
            String::from_utf8(format_users(&users).unwrap()).unwrap(),
            r#"[{"id":"1","email":"a@b.com","age":30},{"id":"2","email":"c@d.com","age":40}]"#
        );
    }

    #[test]
    fn test_user_formats_as_object() {
        let user = User::new("1", "a@b.com", 30);
        assert_eq!(
            format_user(&user).unwrap(),
            br#"{"id":"1","email":"a@b.com","age":30}"#.to_vec()
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_us(12), "12µs");
        assert_eq!(format_duration_us(1_500), "1.50ms");
        assert_eq!(format_duration_us(2_250_000), "2.25s");
    }

    #[test]
    fn test_profiling_table() {
        let stats = vec![
            FunctionStats {
                name: "add".to_string(),
                calls: 1,
                total_us: 1_200,
                avg_us: 1_200,
                p90_us: 1_200,
                max_us: 1_200,
            },
            FunctionStats {
                name: "read_all".to_string(),
                calls: 1,
                total_us: 300,
                avg_us: 300,
                p90_us: 300,
                max_us: 300,
            },
        ];

        let out = format_profiling(&stats);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "TIMING");
        assert!(lines[1].trim_start().starts_with("FUNCTION"));
        assert!(lines[2].contains("add") && lines[2].contains("1.20ms"));
        assert!(lines[3].contains("read_all") && lines[3].contains("300µs"));
        assert_eq!(format_profiling(&[]), "");
    }

    #[test]
    fn test_function_stats_limit() {
        let stats: Vec<FunctionStats> = (0..3)
            .map(|i| FunctionStats {
                name: format!("f{}", i),
                calls: 1,
                total_us: 1,
                avg_us: 1,
                p90_us: 1,
                max_us: 1,
            })
            .collect();
        let lines = format_function_stats(&stats, "", 2);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "... and 1 more");
    }
}
