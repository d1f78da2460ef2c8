//! Auth service provider wiring every generated policy
//!
//! A single file for the whole collection; the policy map follows
//! DataPoint order with one entry per model.

use super::policy::policy_class;
use super::{Generator, php_artifact};
use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::paths::{POLICY_NAMESPACE, PROVIDER_NAMESPACE, resolve};
use crate::php::{Method, PhpClass, PhpFile, PhpValue, Property};
use datapoints_core::ScaffoldResult;
use datapoints_ir::{DataPoint, TemplateOptions};
use std::collections::HashSet;

const AUTH_SERVICE_PROVIDER: &str = "Illuminate\\Foundation\\Support\\Providers\\AuthServiceProvider";

pub const PROVIDER_CLASS: &str = "AuthServiceProvider";

#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderGenerator;

impl Generator for ProviderGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Provider
    }

    fn generate(
        &self,
        data_points: &[DataPoint],
        options: &TemplateOptions,
    ) -> ScaffoldResult<Vec<GeneratedArtifact>> {
        if data_points.is_empty() {
            return Ok(Vec::new());
        }

        let paths = resolve(options);
        let mut file = PhpFile::new(PROVIDER_NAMESPACE, PhpClass::new(PROVIDER_CLASS));
        let base = file.import_as(AUTH_SERVICE_PROVIDER, "ServiceProvider");
        file.class.extends = Some(base);

        let mut seen = HashSet::new();
        let mut policies = Vec::new();
        for dp in data_points {
            let model_name = dp.model_name();
            if !seen.insert(model_name.clone()) {
                continue;
            }
            let model = file.import(&paths.model_class(&model_name));
            let policy = file.import(&format!("{}\\{}", POLICY_NAMESPACE, policy_class(&model_name)));
            policies.push((
                PhpValue::raw(format!("{}::class", model)),
                PhpValue::raw(format!("{}::class", policy)),
            ));
        }

        file.class
            .property(Property::protected("policies", PhpValue::Map(policies)));
        file.class.method(
            Method::public("boot")
                .returns("void")
                .line("$this->registerPolicies();"),
        );

        Ok(vec![php_artifact(
            paths.class_path(PROVIDER_NAMESPACE, PROVIDER_CLASS),
            ArtifactKind::Provider,
            file,
        )])
    }
}
