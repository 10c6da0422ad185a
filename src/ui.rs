// UI layer: asks the operator for whatever the flags did not supply, guards
// against clobbering an existing configuration, then hands off to the API
// client and the writer. Prompts go through `Prompter` so the sequence can
// be driven by scripted answers in tests.

use crate::api::ApiClient;
use crate::cli::RunOptions;
use crate::error::ConfigureError;
use crate::params::{ParamKey, ParamValue, Registry, Validator};
use crate::store;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Source of operator answers.
pub trait Prompter {
    /// Ask for free text. Implementations must only return answers that
    /// pass `validator`.
    fn text(&mut self, prompt: &str, validator: Option<Validator>) -> io::Result<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<bool>;
}

/// `dialoguer`-backed prompter for an interactive terminal. Rejected
/// answers are explained inline and asked again.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn text(&mut self, prompt: &str, validator: Option<Validator>) -> io::Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .validate_with(|answer: &String| check_answer(answer, validator))
            .interact_text()
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
    }
}

/// Validate a typed answer the way `collect` will store it: trimmed.
pub fn check_answer(answer: &str, validator: Option<Validator>) -> Result<(), String> {
    match validator {
        Some(validate) => validate(answer.trim()),
        None => Ok(()),
    }
}

/// Which questions still need asking, computed from the registry before
/// any prompt is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptPlan {
    pub panel_url: bool,
    pub token: bool,
    pub overwrite: bool,
}

impl PromptPlan {
    pub fn new(registry: &Registry, config_exists: bool) -> Self {
        PromptPlan {
            panel_url: !registry.is_supplied(ParamKey::PanelUrl),
            token: !registry.is_supplied(ParamKey::Token),
            overwrite: config_exists && !registry.flag(ParamKey::Overwrite),
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.panel_url || self.token || self.overwrite)
    }
}

/// Ask, in registry order, for every value the plan marks as missing and
/// store the answers.
pub fn collect(
    registry: &mut Registry,
    config_exists: bool,
    prompter: &mut dyn Prompter,
) -> Result<(), ConfigureError> {
    let plan = PromptPlan::new(registry, config_exists);
    debug!(?plan, "prompt plan");

    for (key, wanted) in [
        (ParamKey::PanelUrl, plan.panel_url),
        (ParamKey::Token, plan.token),
    ] {
        if !wanted {
            continue;
        }
        let param = registry.get(key);
        let answer = prompter
            .text(param.name, param.validator)
            .map_err(ConfigureError::Prompt)?;
        registry.set(key, ParamValue::Text(answer.trim().to_string()))?;
    }

    if plan.overwrite {
        let consent = prompter
            .confirm("A configuration file already exists. Overwrite it?", false)
            .map_err(ConfigureError::Prompt)?;
        registry.set(ParamKey::Overwrite, ParamValue::Flag(consent))?;
    }
    Ok(())
}

/// Refuse to continue when a configuration exists and the operator has not
/// agreed to replace it.
pub fn ensure_consent(
    registry: &Registry,
    config_exists: bool,
    path: &Path,
) -> Result<(), ConfigureError> {
    if config_exists && !registry.flag(ParamKey::Overwrite) {
        return Err(ConfigureError::ExistingConfig {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Full configure sequence: existence check, prompts, overwrite guard,
/// fetch, write. Returns the path written on success.
pub fn run(
    mut registry: Registry,
    options: &RunOptions,
    prompter: &mut dyn Prompter,
) -> Result<PathBuf, ConfigureError> {
    let path = options.config_path.as_path();
    let exists = store::config_exists(path);
    debug!(path = %path.display(), exists, "checked for existing configuration");

    collect(&mut registry, exists, prompter)?;
    ensure_consent(&registry, exists, path)?;

    let (panel_url, token) = registry.credentials()?;
    let api = ApiClient::new(panel_url, options.timeout)?;

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Fetching configuration from {}...", api.base_url()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let fetched = api.fetch_configuration(token);
    spinner.finish_and_clear();
    let document = fetched?;

    store::write_configuration(path, &document)?;
    info!(path = %path.display(), "configuration written");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    const TOKEN: &str = "01234567890123456789012345678901";
    const PANEL: &str = "https://panel.example.com";

    #[derive(Debug)]
    enum Answer {
        Text(&'static str),
        Yes,
        No,
    }

    /// Replays canned answers and records every prompt it was shown.
    struct Scripted {
        answers: VecDeque<Answer>,
        asked: Vec<String>,
    }

    impl Scripted {
        fn new(answers: Vec<Answer>) -> Self {
            Scripted {
                answers: answers.into(),
                asked: Vec::new(),
            }
        }
    }

    impl Prompter for Scripted {
        fn text(&mut self, prompt: &str, _validator: Option<Validator>) -> io::Result<String> {
            self.asked.push(prompt.to_string());
            match self.answers.pop_front() {
                Some(Answer::Text(text)) => Ok(text.to_string()),
                other => panic!("expected text answer for {:?}, had {:?}", prompt, other),
            }
        }

        fn confirm(&mut self, prompt: &str, _default: bool) -> io::Result<bool> {
            self.asked.push(prompt.to_string());
            match self.answers.pop_front() {
                Some(Answer::Yes) => Ok(true),
                Some(Answer::No) => Ok(false),
                other => panic!("expected yes/no answer for {:?}, had {:?}", prompt, other),
            }
        }
    }

    fn supplied() -> Registry {
        let mut registry = Registry::new();
        registry
            .set(ParamKey::PanelUrl, ParamValue::Text(PANEL.into()))
            .unwrap();
        registry
            .set(ParamKey::Token, ParamValue::Text(TOKEN.into()))
            .unwrap();
        registry
    }

    #[test]
    fn nothing_asked_when_flags_complete_and_no_file() {
        let mut registry = supplied();
        let mut prompter = Scripted::new(vec![]);
        assert!(PromptPlan::new(&registry, false).is_empty());

        collect(&mut registry, false, &mut prompter).unwrap();
        assert!(prompter.asked.is_empty());
        ensure_consent(&registry, false, Path::new("/config/core.json")).unwrap();
    }

    #[test]
    fn asks_missing_values_in_order() {
        let mut registry = Registry::new();
        let mut prompter = Scripted::new(vec![Answer::Text(PANEL), Answer::Text(TOKEN)]);

        collect(&mut registry, false, &mut prompter).unwrap();
        assert_eq!(prompter.asked, vec!["Panel URL", "Configuration token"]);
        assert_eq!(registry.credentials().unwrap(), (PANEL, TOKEN));
    }

    #[test]
    fn asks_only_for_token_when_url_supplied() {
        let mut registry = Registry::new();
        registry
            .set(ParamKey::PanelUrl, ParamValue::Text(PANEL.into()))
            .unwrap();
        let mut prompter = Scripted::new(vec![Answer::Text(TOKEN)]);

        collect(&mut registry, false, &mut prompter).unwrap();
        assert_eq!(prompter.asked, vec!["Configuration token"]);
    }

    #[test]
    fn existing_file_prompts_and_no_aborts() {
        let mut registry = supplied();
        let mut prompter = Scripted::new(vec![Answer::No]);

        collect(&mut registry, true, &mut prompter).unwrap();
        assert_eq!(prompter.asked.len(), 1);
        let err = ensure_consent(&registry, true, Path::new("/config/core.json")).unwrap_err();
        assert!(matches!(err, ConfigureError::ExistingConfig { .. }), "{:?}", err);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn existing_file_prompts_and_yes_proceeds() {
        let mut registry = supplied();
        let mut prompter = Scripted::new(vec![Answer::Yes]);

        collect(&mut registry, true, &mut prompter).unwrap();
        assert!(registry.flag(ParamKey::Overwrite));
        ensure_consent(&registry, true, Path::new("/config/core.json")).unwrap();
    }

    #[test]
    fn overwrite_flag_skips_confirmation() {
        let mut registry = supplied();
        registry
            .set(ParamKey::Overwrite, ParamValue::Flag(true))
            .unwrap();
        let mut prompter = Scripted::new(vec![]);

        collect(&mut registry, true, &mut prompter).unwrap();
        assert!(prompter.asked.is_empty());
        ensure_consent(&registry, true, Path::new("/config/core.json")).unwrap();
    }

    #[test]
    fn answers_are_checked_after_trimming() {
        let validator = Registry::new().get(ParamKey::Token).validator;
        let padded = format!("  {} \n", TOKEN);
        assert_eq!(check_answer(&padded, validator), Ok(()));

        let short_plus_space = format!("{} ", &TOKEN[..31]);
        let reason = check_answer(&short_plus_space, validator).unwrap_err();
        assert!(reason.contains("got 31"), "{}", reason);
    }

    #[test]
    fn padded_answer_is_stored_trimmed() {
        let mut registry = Registry::new();
        let mut prompter = Scripted::new(vec![
            Answer::Text(" https://panel.example.com "),
            Answer::Text(" 01234567890123456789012345678901\t"),
        ]);

        collect(&mut registry, false, &mut prompter).unwrap();
        assert_eq!(registry.credentials().unwrap(), (PANEL, TOKEN));
    }

    #[test]
    fn invalid_scripted_answer_is_rejected() {
        let mut registry = Registry::new();
        let mut prompter = Scripted::new(vec![Answer::Text("not a url")]);

        let err = collect(&mut registry, false, &mut prompter).unwrap_err();
        assert!(matches!(err, ConfigureError::Validation(_)), "{:?}", err);
    }

    #[test]
    fn declined_overwrite_never_touches_network_or_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("core.json");
        std::fs::write(&path, "{}").unwrap();

        // Nothing listens on this address; reaching the fetch would fail
        // with a transport error instead.
        let mut registry = Registry::new();
        registry
            .set(ParamKey::PanelUrl, ParamValue::Text("http://127.0.0.1:9".into()))
            .unwrap();
        registry
            .set(ParamKey::Token, ParamValue::Text(TOKEN.into()))
            .unwrap();
        let options = RunOptions {
            config_path: path.clone(),
            timeout: Some(Duration::from_secs(1)),
        };
        let mut prompter = Scripted::new(vec![Answer::No]);

        let err = run(registry, &options, &mut prompter).unwrap_err();
        assert!(matches!(err, ConfigureError::ExistingConfig { .. }), "{:?}", err);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
