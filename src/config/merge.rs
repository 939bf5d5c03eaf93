//! Merge CLI flags over the loaded configuration.

use crate::domain::{Config, OutputFormat};

/// Values supplied on the command line. `None`/`false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_total_tokens: Option<usize>,
    pub output_format: Option<OutputFormat>,
    pub project_name: Option<String>,
    pub preamble: Option<String>,
    pub goal: Option<String>,
    pub exclude_globs: Option<Vec<String>>,
    pub no_structure_map: bool,
    pub no_doc_priority: bool,
    pub no_signatures: bool,
    pub no_compression: bool,
    pub chain_of_thought: bool,
    pub few_shot: bool,
    pub constraints: bool,
    pub no_gitignore: bool,
}

pub fn merge_cli_with_config(mut config: Config, cli: &CliOverrides) -> Config {
    let generation = &mut config.generation;

    if let Some(max) = cli.max_total_tokens {
        generation.max_total_tokens = max;
    }
    if let Some(format) = cli.output_format {
        generation.output_format = format;
    }
    if cli.no_structure_map {
        generation.include_structure_map = false;
    }
    if cli.no_doc_priority {
        generation.prioritize_documentation = false;
    }
    if cli.no_signatures {
        generation.extract_code_signatures = false;
    }
    if cli.no_compression {
        generation.adaptive_compression = false;
    }
    if cli.chain_of_thought {
        generation.include_chain_of_thought = true;
    }
    if cli.few_shot {
        generation.include_few_shot_examples = true;
    }
    if cli.constraints {
        generation.include_constraints = true;
    }

    if cli.project_name.is_some() {
        config.project_name = cli.project_name.clone();
    }
    if cli.preamble.is_some() {
        config.preamble = cli.preamble.clone();
    }
    if cli.goal.is_some() {
        config.goal = cli.goal.clone();
    }
    if let Some(globs) = &cli.exclude_globs {
        config.exclude_globs.extend(globs.iter().cloned());
    }
    if cli.no_gitignore {
        config.respect_gitignore = false;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_values_override_config() {
        let config = Config { goal: Some("from file".to_string()), ..Config::default() };
        let cli = CliOverrides {
            max_total_tokens: Some(2_000),
            output_format: Some(OutputFormat::Json),
            goal: Some("from cli".to_string()),
            no_structure_map: true,
            constraints: true,
            exclude_globs: Some(vec!["**/*.snap".to_string()]),
            ..CliOverrides::default()
        };

        let merged = merge_cli_with_config(config, &cli);
        assert_eq!(merged.generation.max_total_tokens, 2_000);
        assert_eq!(merged.generation.output_format, OutputFormat::Json);
        assert_eq!(merged.goal.as_deref(), Some("from cli"));
        assert!(!merged.generation.include_structure_map);
        assert!(merged.generation.include_constraints);
        assert!(merged.exclude_globs.contains(&"**/*.snap".to_string()));
        assert!(merged.exclude_globs.contains(&"**/node_modules/**".to_string()));
    }

    #[test]
    fn absent_flags_keep_config_values() {
        let config = Config { project_name: Some("demo".to_string()), ..Config::default() };
        let merged = merge_cli_with_config(config.clone(), &CliOverrides::default());
        assert_eq!(merged, config);
    }
}
