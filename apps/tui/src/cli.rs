use clap::{CommandFactory, Parser};

#[derive(Debug, Parser)]
#[command(name = "charts-tui", version, about = "Music charts TUI")]
pub struct CliArgs {
    /// Base URL or directory holding the DATABASES tree
    #[arg(long, value_name = "URL|PATH")]
    pub source: Option<String>,

    /// Open this platform's list instead of the home screen
    /// (spotify, apple_music, youtube, billboard, topsongs, topartists)
    #[arg(long)]
    pub platform: Option<String>,

    /// Chart code to open, e.g. `mx` or `global200`
    #[arg(long)]
    pub chart: Option<String>,

    /// Override the number of rows shown
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print the chart and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless chart as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Start with home widget rotation paused
    #[arg(long = "no-rotate")]
    pub no_rotate: bool,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(source) = &self.source {
            std::env::set_var("CHARTS_SOURCE", source);
        }
        if self.debug {
            std::env::set_var("CHARTS_DEBUG", "1");
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::Parser;

    #[test]
    fn parses_chart_flags() {
        let args = CliArgs::parse_from([
            "charts-tui",
            "--platform",
            "billboard",
            "--chart",
            "global200",
            "--limit",
            "10",
            "--headless",
            "--no-rotate",
        ]);

        assert_eq!(args.platform.as_deref(), Some("billboard"));
        assert_eq!(args.chart.as_deref(), Some("global200"));
        assert_eq!(args.limit, Some(10));
        assert!(args.headless && args.no_rotate);
        assert!(!args.json);
    }

    #[test]
    fn help_mentions_every_flag() {
        let help = CliArgs::help_text();
        for flag in ["--source", "--platform", "--chart", "--limit", "--json", "--no-rotate"] {
            assert!(help.contains(flag), "missing {flag}");
        }
    }
}
