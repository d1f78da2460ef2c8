//! Interactive prompts
//!
//! Commands ask questions through [`PromptSource`] so the same flow runs
//! against a terminal ([`DialoguerPrompts`]), unattended ([`DefaultsPrompts`])
//! or a scripted source in tests.

use anyhow::{Context, bail};
use datapoints_core::ControllerType;
use datapoints_ir::{TemplateOptions, TemplateRegistry};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

/// Where answers come from
pub trait PromptSource {
    /// Pick one of `options`; returns the chosen entry
    fn select(&self, label: &str, options: &[String], default: usize) -> anyhow::Result<String>;

    fn confirm(&self, label: &str, default: bool) -> anyhow::Result<bool>;

    /// Free text; `None` when left blank
    fn text(&self, label: &str, default: Option<&str>) -> anyhow::Result<Option<String>>;
}

// ============================================================================
// Terminal
// ============================================================================

/// Prompts on the terminal
pub struct DialoguerPrompts {
    theme: ColorfulTheme,
}

impl DialoguerPrompts {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompts {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptSource for DialoguerPrompts {
    fn select(&self, label: &str, options: &[String], default: usize) -> anyhow::Result<String> {
        let index = Select::with_theme(&self.theme)
            .with_prompt(label)
            .items(options)
            .default(default)
            .interact()?;
        options
            .get(index)
            .cloned()
            .with_context(|| format!("no option at index {}", index))
    }

    fn confirm(&self, label: &str, default: bool) -> anyhow::Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(label)
            .default(default)
            .interact()?)
    }

    fn text(&self, label: &str, default: Option<&str>) -> anyhow::Result<Option<String>> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(true);
        if let Some(value) = default {
            input = input.default(value.to_string());
        }
        let value = input.interact_text()?;
        let value = value.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }
}

// ============================================================================
// Unattended
// ============================================================================

/// Answers every prompt with its default
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultsPrompts;

impl PromptSource for DefaultsPrompts {
    fn select(&self, label: &str, options: &[String], default: usize) -> anyhow::Result<String> {
        options
            .get(default)
            .or_else(|| options.first())
            .cloned()
            .with_context(|| format!("nothing to choose for '{}'", label))
    }

    fn confirm(&self, _label: &str, default: bool) -> anyhow::Result<bool> {
        Ok(default)
    }

    fn text(&self, _label: &str, default: Option<&str>) -> anyhow::Result<Option<String>> {
        Ok(default.map(str::to_string))
    }
}

// ============================================================================
// Forms
// ============================================================================

/// Ask which registered template to scaffold
pub fn choose_template(
    prompts: &dyn PromptSource,
    registry: &TemplateRegistry,
) -> anyhow::Result<String> {
    let names: Vec<String> = registry.names().iter().map(|n| n.to_string()).collect();
    if names.is_empty() {
        bail!("no templates are registered");
    }
    prompts.select("Template", &names, 0)
}

/// Walk through the options form, starting from `base`
pub fn options_form(
    prompts: &dyn PromptSource,
    base: &TemplateOptions,
) -> anyhow::Result<TemplateOptions> {
    let controllers: Vec<String> = ControllerType::all()
        .iter()
        .map(|c| c.as_str().to_string())
        .collect();
    let current = ControllerType::all()
        .iter()
        .position(|c| *c == base.controller_type)
        .unwrap_or(0);

    let controller_type: ControllerType = prompts
        .select("Controller type", &controllers, current)?
        .parse()?;
    let with_tests =
        prompts.confirm("Record withTests (reserved, generates nothing)?", base.with_tests)?;
    let with_factory = prompts.confirm("Generate factories?", base.with_factory)?;
    let with_seeder = prompts.confirm("Generate seeders?", base.with_seeder)?;
    let namespace = prompts.text("Model namespace (blank for App\\Models)", base.namespace.as_deref())?;

    Ok(TemplateOptions {
        controller_type,
        with_tests,
        with_factory,
        with_seeder,
        namespace,
        ..base.clone()
    })
}

// ============================================================================
// Tests
// ============================================================================
