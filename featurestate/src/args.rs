use text_colorizer::Colorize;

pub const DEFAULT_CONFIG: &str = "featurestate.toml";

#[derive(Debug, PartialEq, Eq)]
pub struct Arguments {
    pub config: String,
    /// `--test` on the command line; forces a dry run regardless of the document
    pub test: bool,
}

impl Arguments {
    pub fn parse<I>(args: I) -> Result<Arguments, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = DEFAULT_CONFIG.to_string();
        let mut test = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--test" => test = true,
                "--config" => {
                    config = args
                        .next()
                        .ok_or_else(|| "--config needs a path".to_string())?;
                }
                other => return Err(format!("unknown argument '{}'", other)),
            }
        }

        Ok(Arguments { config, test })
    }
}

pub fn print_usage(error: &str) {
    eprintln!("{} - {}", "featurestate".green(), error);
    eprintln!(
        "Usage: {} {} {}",
        "featurestate".green(),
        "[--test]".blue(),
        "[--config <path>]".blue()
    );
}

pub fn parse_args() -> Arguments {
    match Arguments::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            print_usage(&e);
            std::process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Arguments, String> {
        Arguments::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            parse(&[]).unwrap(),
            Arguments {
                config: DEFAULT_CONFIG.to_string(),
                test: false
            }
        );
    }

    #[test]
    fn test_flags() {
        let args = parse(&["--config", "C:\\states\\web.toml", "--test"]).unwrap();
        assert_eq!(args.config, "C:\\states\\web.toml");
        assert!(args.test);
    }

    #[test]
    fn test_errors() {
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["--apply"]).is_err());
    }
}
