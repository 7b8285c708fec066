use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "zipfix")]
#[command(version)]
#[command(about = "Clear pseudo-encryption flags from ZIP archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipfix secret.zip              repair secret.zip, original kept as secret.zip.bak\n  \
  zipfix -c *.zip                report pseudo-encrypted archives without writing\n  \
  zipfix -v broken.zip           list every header found and its flags")]
pub struct Cli {
    /// ZIP files to repair
    #[arg(value_name = "FILES", required = true, num_args = 1.., value_parser = clap::value_parser!(PathBuf))]
    pub files: Vec<PathBuf>,

    /// Only report pseudo-encrypted headers, write nothing
    #[arg(short = 'c', long = "check")]
    pub check: bool,

    /// List every header found
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_files() {
        let cli = Cli::try_parse_from(["zipfix", "-c", "-qq", "a.zip", "b.zip"]).unwrap();
        assert!(cli.check);
        assert!(cli.is_very_quiet());
        assert_eq!(cli.files, vec![PathBuf::from("a.zip"), PathBuf::from("b.zip")]);
    }

    #[cfg(unix)]
    #[test]
    fn accepts_non_utf8_paths() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let name = OsString::from_vec(vec![b'a', 0xFF, b'.', b'z', b'i', b'p']);
        let cli = Cli::try_parse_from([OsString::from("zipfix"), name.clone()]).unwrap();
        assert_eq!(cli.files, vec![PathBuf::from(name)]);
    }

    #[test]
    fn requires_at_least_one_file() {
        assert!(Cli::try_parse_from(["zipfix"]).is_err());
    }
}
