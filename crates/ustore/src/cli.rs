use std::ffi::OsString;

use clap::Parser;

use crate::perform::Arguments;

const MAIN_HELP: &str = r#"ustore keeps a list of user records in a single JSON file and performs one
operation on it per invocation.

Records look like {"id":"1","email":"a@b.com","age":30}. The file may be empty
or absent, which means an empty collection.

  ustore -operation list -fileName users.json
  ustore -operation add -item '{"id":"1","email":"a@b.com","age":30}' -fileName users.json
  ustore -operation findById -id 1 -fileName users.json
  ustore -operation remove -id 1 -fileName users.json

Flags may be written with one dash or two."#;

#[derive(Parser, Debug)]
#[command(name = "ustore")]
#[command(about = MAIN_HELP)]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Operation to perform: list, add, remove or findById")]
    pub operation: Option<String>,

    #[arg(long = "fileName", help = "Path of the JSON collection file")]
    pub file_name: Option<String>,

    #[arg(long, allow_hyphen_values = true, help = "JSON record to add")]
    pub item: Option<String>,

    #[arg(long, allow_hyphen_values = true, help = "Record id for remove and findById")]
    pub id: Option<String>,

    #[arg(long, help = "Print timing information for profiling")]
    pub profile: bool,

    #[arg(short, long, help = "Log debug output to stderr")]
    pub verbose: bool,

    #[arg(long, help = "Print config file location and contents")]
    pub print_config: bool,
}

impl Cli {
    pub fn parse_normalized() -> Self {
        Cli::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn arguments(&self) -> Arguments {
        Arguments {
            operation: self.operation.clone(),
            file_name: self.file_name.clone(),
            item: self.item.clone(),
            id: self.id.clone(),
        }
    }
}

const LONG_FLAGS: &[&str] = &[
    "operation",
    "fileName",
    "item",
    "id",
    "profile",
    "verbose",
    "print-config",
];

const VALUE_FLAGS: &[&str] = &["operation", "fileName", "item", "id"];

/// Rewrites single-dash long flags (`-fileName x`, `-id=3`) into the
/// double-dash form clap expects. Values following a flag are left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut expect_value = false;

    for (index, arg) in args.into_iter().enumerate() {
        if index == 0 || expect_value {
            expect_value = false;
            out.push(arg);
            continue;
        }

        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };

        let (dashes, body) = if let Some(body) = text.strip_prefix("--") {
            ("--", body)
        } else if let Some(body) = text.strip_prefix('-') {
            ("-", body)
        } else {
            out.push(arg);
            continue;
        };

        let (name, has_inline_value) = match body.split_once('=') {
            Some((name, _)) => (name, true),
            None => (body, false),
        };

        if !LONG_FLAGS.contains(&name) {
            out.push(arg);
            continue;
        }

        expect_value = VALUE_FLAGS.contains(&name) && !has_inline_value;
        if dashes == "-" {
            out.push(OsString::from(format!("-{}", text)));
        } else {
            out.push(arg);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    fn parse(items: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_args(args(items))).unwrap()
    }

    #[test]
    fn test_single_dash_flags_are_doubled() {
        assert_eq!(
            normalize_args(args(&["ustore", "-operation", "list", "-fileName", "u.json"])),
            args(&["ustore", "--operation", "list", "--fileName", "u.json"])
        );
    }

    #[test]
    fn test_values_are_not_rewritten() {
        assert_eq!(
            normalize_args(args(&["ustore", "-id", "-item", "-operation=remove"])),
            args(&["ustore", "--id", "-item", "--operation=remove"])
        );
    }

    #[test]
    fn test_unknown_and_short_flags_pass_through() {
        assert_eq!(
            normalize_args(args(&["ustore", "-v", "-x", "--profile"])),
            args(&["ustore", "-v", "-x", "--profile"])
        );
    }

    #[test]
    fn test_parse_go_style_invocation() {
        let cli = parse(&[
            "ustore",
            "-operation",
            "add",
            "-item",
            r#"{"id":"1","email":"a@b.com","age":30}"#,
            "-fileName=users.json",
        ]);
        let arguments = cli.arguments();
        assert_eq!(arguments.operation.as_deref(), Some("add"));
        assert_eq!(arguments.file_name.as_deref(), Some("users.json"));
        assert_eq!(
            arguments.item.as_deref(),
            Some(r#"{"id":"1","email":"a@b.com","age":30}"#)
        );
        assert_eq!(arguments.id, None);
    }

    #[test]
    fn test_hyphen_id_value() {
        let cli = parse(&["ustore", "-operation", "findById", "-id", "-7", "-fileName", "u.json"]);
        assert_eq!(cli.id.as_deref(), Some("-7"));
    }

    #[test]
    fn test_ambient_flags() {
        let cli = parse(&["ustore", "--profile", "-v", "-print-config"]);
        assert!(cli.profile);
        assert!(cli.verbose);
        assert!(cli.print_config);
        assert_eq!(cli.operation, None);
    }
}
