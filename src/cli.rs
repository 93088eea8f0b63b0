//! Command-line arguments of the `matbench` binary.

use std::path::PathBuf;

use crate::error::{invalid_argument, Result};

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    /// Where to write the CSV stream; `None` prints results only.
    pub output: Option<PathBuf>,
}

/// Parses the arguments that follow the program name.
///
/// The only flag is `-o FILE` / `--output FILE`. A repeated flag keeps the
/// last value. Anything else, or a flag without its value, is an
/// [`InvalidArgument`](crate::error::MatbenchError::InvalidArgument).
pub fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| invalid_argument(format!("missing value for {arg}")))?;
                parsed.output = Some(PathBuf::from(value));
            }
            other => return Err(invalid_argument(format!("unknown argument: {other}"))),
        }
    }

    Ok(parsed)
}

/// Usage text printed alongside an argument error.
pub fn usage(program: &str) -> String {
    format!(
        "usage: {program} [-o FILE]\n\
         \n\
         options:\n  \
           -o, --output FILE   also write results as CSV to FILE\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatbenchError;

    fn parse(args: &[&str]) -> Result<Args> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(parse(&[]).unwrap(), Args { output: None });
    }

    #[test]
    fn test_short_and_long_output() {
        let expected = Args {
            output: Some(PathBuf::from("results.csv")),
        };
        assert_eq!(parse(&["-o", "results.csv"]).unwrap(), expected);
        assert_eq!(parse(&["--output", "results.csv"]).unwrap(), expected);
    }

    #[test]
    fn test_last_output_wins() {
        let args = parse(&["-o", "a.csv", "--output", "b.csv"]).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("b.csv")));
    }

    #[test]
    fn test_missing_value() {
        let err = parse(&["-o"]).unwrap_err();
        assert_eq!(
            err,
            MatbenchError::InvalidArgument {
                message: "missing value for -o".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_argument() {
        for bad in [&["-x"][..], &["results.csv"], &["-o", "r.csv", "--verbose"]] {
            assert!(matches!(
                parse(bad),
                Err(MatbenchError::InvalidArgument { .. })
            ));
        }
    }

    #[test]
    fn test_usage_names_program_and_flag() {
        let text = usage("matbench");
        assert!(text.starts_with("usage: matbench [-o FILE]"));
        assert!(text.contains("--output FILE"));
    }
}
