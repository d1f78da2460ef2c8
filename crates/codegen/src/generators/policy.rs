//! Policy generator: a seven-ability authorization class per DataPoint.
//! Every ability allows; the bodies are meant to be filled in by hand.

use super::{Generator, php_artifact};
use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::paths::{AUTH_USER_CLASS, POLICY_NAMESPACE, ResolvedPaths, resolve};
use crate::php::{Method, PhpClass, PhpFile};
use datapoints_core::ScaffoldResult;
use datapoints_ir::{DataPoint, TemplateOptions};

const HANDLES_AUTHORIZATION: &str = "Illuminate\\Auth\\Access\\HandlesAuthorization";

/// Abilities in emission order, and whether each receives the model
pub const ABILITIES: [(&str, bool); 7] = [
    ("viewAny", false),
    ("view", true),
    ("create", false),
    ("update", true),
    ("delete", true),
    ("restore", true),
    ("forceDelete", true),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyGenerator;

impl Generator for PolicyGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Policy
    }

    fn generate(
        &self,
        data_points: &[DataPoint],
        options: &TemplateOptions,
    ) -> ScaffoldResult<Vec<GeneratedArtifact>> {
        let paths = resolve(options);
        Ok(data_points
            .iter()
            .map(|dp| {
                let class = policy_class(&dp.model_name());
                php_artifact(
                    paths.class_path(POLICY_NAMESPACE, &class),
                    ArtifactKind::Policy,
                    build_policy(dp, &class, &paths),
                )
            })
            .collect())
    }
}

pub fn policy_class(model: &str) -> String {
    format!("{}Policy", model)
}

fn build_policy(dp: &DataPoint, class: &str, paths: &ResolvedPaths) -> PhpFile {
    let mut file = PhpFile::new(POLICY_NAMESPACE, PhpClass::new(class));
    let handles = file.import(HANDLES_AUTHORIZATION);
    file.class.use_trait(handles);

    let model_name = dp.model_name();
    let model_class = paths.model_class(&model_name);

    let (user, model, variable) = if model_class == AUTH_USER_CLASS {
        let user = file.import(AUTH_USER_CLASS);
        (user.clone(), user, "$model".to_string())
    } else if model_name == "User" {
        let user = file.import_as(AUTH_USER_CLASS, "AuthUser");
        (user, file.import(&model_class), "$model".to_string())
    } else {
        (
            file.import(AUTH_USER_CLASS),
            file.import(&model_class),
            format!("${}", dp.variable_name()),
        )
    };

    for (ability, with_model) in ABILITIES {
        let mut method = Method::public(ability)
            .param(format!("{} $user", user))
            .returns("bool");
        if with_model {
            method = method.param(format!("{} {}", model, variable));
        }
        file.class.method(method.line("return true;"));
    }
    file
}
