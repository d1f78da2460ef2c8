//! # Controller Generator
//!
//! The method set follows [`ControllerType`]:
//!
//! - `api`: index/store/show/update/destroy returning JSON resources
//! - `web`: the seven resourceful actions returning views and redirects
//! - `invokable`: a single `__invoke` rendering the index view
//!
//! Store and update take the generated form requests whenever the
//! controller type requires them, otherwise the plain request.

use super::{Generator, php_artifact};
use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::paths::{CONTROLLER_NAMESPACE, REQUEST_NAMESPACE, RESOURCE_NAMESPACE, ResolvedPaths, resolve};
use crate::php::{Method, PhpClass, PhpFile, PhpValue, quote};
use datapoints_core::{ControllerType, ScaffoldResult};
use datapoints_ir::{DataPoint, TemplateOptions, naming};

const HTTP_REQUEST: &str = "Illuminate\\Http\\Request";
const HTTP_RESPONSE: &str = "Illuminate\\Http\\Response";
const REDIRECT_RESPONSE: &str = "Illuminate\\Http\\RedirectResponse";
const VIEW: &str = "Illuminate\\View\\View";

/// Generates one controller per DataPoint
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerGenerator;

impl Generator for ControllerGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Controller
    }

    fn generate(
        &self,
        data_points: &[DataPoint],
        options: &TemplateOptions,
    ) -> ScaffoldResult<Vec<GeneratedArtifact>> {
        if !options.controller_type.generates_controller() {
            return Ok(Vec::new());
        }

        let paths = resolve(options);
        Ok(data_points
            .iter()
            .map(|dp| {
                let class = format!("{}Controller", dp.model_name());
                let file = ControllerBuilder::new(dp, &class, &paths, options).build();
                php_artifact(
                    paths.class_path(CONTROLLER_NAMESPACE, &class),
                    ArtifactKind::Controller,
                    file,
                )
            })
            .collect())
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Names shared by every action of one controller
struct ControllerBuilder<'a> {
    dp: &'a DataPoint,
    options: &'a TemplateOptions,
    file: PhpFile,
    model: String,
    /// `$post`
    single: String,
    /// `$posts`
    many: String,
    /// `post` in `post.index`
    view_prefix: String,
}

impl<'a> ControllerBuilder<'a> {
    fn new(
        dp: &'a DataPoint,
        class: &str,
        paths: &ResolvedPaths,
        options: &'a TemplateOptions,
    ) -> Self {
        let mut file = PhpFile::new(CONTROLLER_NAMESPACE, PhpClass::new(class));
        file.class.extends = Some("Controller".to_string());
        let model = file.import(&paths.model_class(&dp.model_name()));

        Self {
            dp,
            options,
            file,
            single: format!("${}", dp.variable_name()),
            many: format!("${}", naming::camel(&naming::plural(&dp.model_name()))),
            view_prefix: dp.route_key(),
            model,
        }
    }

    fn build(mut self) -> PhpFile {
        match self.options.controller_type {
            ControllerType::Api => self.api_actions(),
            ControllerType::Web => self.web_actions(),
            ControllerType::Invokable => self.invokable_action(),
            ControllerType::None => {}
        }
        self.file
    }

    /// Parameter type for store/update
    fn request_param(&mut self, action: &str) -> String {
        if self.options.should_generate_requests() {
            let class = format!("{}{}Request", action, self.model);
            self.file
                .import(&format!("{}\\{}", REQUEST_NAMESPACE, class))
        } else {
            self.file.import(HTTP_REQUEST)
        }
    }

    fn request_data(&self) -> &'static str {
        if self.options.should_generate_requests() {
            "$request->validated()"
        } else {
            "$request->all()"
        }
    }

    fn eager_loads(&self) -> Option<String> {
        let relations: Vec<PhpValue> = self
            .dp
            .distinct_relationships()
            .iter()
            .map(|r| PhpValue::str(r.accessor_name()))
            .collect();
        if relations.is_empty() {
            None
        } else {
            Some(PhpValue::Inline(relations).render())
        }
    }

    fn view(&self, action: &str) -> String {
        quote(&format!("{}.{}", self.view_prefix, action))
    }

    fn model_param(&self) -> String {
        format!("{} {}", self.model, self.single)
    }

    // ========================================================================
    // API
    // ========================================================================

    fn api_actions(&mut self) {
        let (resource, collection) = if self.options.should_generate_resources() {
            let resource = self.file.import(&format!(
                "{}\\{}",
                RESOURCE_NAMESPACE,
                super::resource::resource_class(&self.model)
            ));
            let collection = self.file.import(&format!(
                "{}\\{}",
                RESOURCE_NAMESPACE,
                super::resource::collection_class(&self.model)
            ));
            (resource, collection)
        } else {
            let resource = self
                .file
                .import("Illuminate\\Http\\Resources\\Json\\JsonResource");
            (resource.clone(), resource)
        };
        let response = self.file.import(HTTP_RESPONSE);
        let store_request = self.request_param("Store");
        let update_request = self.request_param("Update");
        let data = self.request_data();
        let model = self.model.clone();
        let single = self.single.clone();

        let (query, loaded) = match self.eager_loads() {
            Some(list) => (
                format!("{}::with({})->paginate()", model, list),
                format!("{}->load({})", single, list),
            ),
            None => (format!("{}::paginate()", model), single.clone()),
        };
        let collection_expr = if collection == resource {
            format!("{}::collection({})", resource, query)
        } else {
            format!("new {}({})", collection, query)
        };

        let class = &mut self.file.class;
        class.method(
            Method::public("index")
                .returns(collection.clone())
                .line(format!("return {};", collection_expr)),
        );
        class.method(
            Method::public("store")
                .param(format!("{} $request", store_request))
                .returns(resource.clone())
                .line(format!("{} = {}::create({});", single, model, data))
                .blank()
                .line(format!("return new {}({});", resource, single)),
        );
        class.method(
            Method::public("show")
                .param(format!("{} {}", model, single))
                .returns(resource.clone())
                .line(format!("return new {}({});", resource, loaded)),
        );
        class.method(
            Method::public("update")
                .param(format!("{} $request", update_request))
                .param(format!("{} {}", model, single))
                .returns(resource.clone())
                .line(format!("{}->update({});", single, data))
                .blank()
                .line(format!("return new {}({});", resource, single)),
        );
        class.method(
            Method::public("destroy")
                .param(format!("{} {}", model, single))
                .returns(response)
                .line(format!("{}->delete();", single))
                .blank()
                .line("return response()->noContent();"),
        );
    }

    // ========================================================================
    // Web
    // ========================================================================

    fn web_actions(&mut self) {
        let view = self.file.import(VIEW);
        let redirect = self.file.import(REDIRECT_RESPONSE);
        let store_request = self.request_param("Store");
        let update_request = self.request_param("Update");
        let data = self.request_data();
        let model = self.model.clone();
        let single = self.single.clone();
        let many = self.many.clone();
        let model_param = self.model_param();
        let back_to_index = format!("return redirect()->route({});", self.view("index"));

        let methods = vec![
            Method::public("index")
                .returns(view.clone())
                .line(format!("{} = {}::latest()->paginate();", many, model))
                .blank()
                .line(format!(
                    "return view({}, compact({}));",
                    self.view("index"),
                    quote(&many[1..])
                )),
            Method::public("create")
                .returns(view.clone())
                .line(format!("return view({});", self.view("create"))),
            Method::public("store")
                .param(format!("{} $request", store_request))
                .returns(redirect.clone())
                .line(format!("{}::create({});", model, data))
                .blank()
                .line(back_to_index.clone()),
            Method::public("show")
                .param(model_param.clone())
                .returns(view.clone())
                .line(format!(
                    "return view({}, compact({}));",
                    self.view("show"),
                    quote(&single[1..])
                )),
            Method::public("edit")
                .param(model_param.clone())
                .returns(view)
                .line(format!(
                    "return view({}, compact({}));",
                    self.view("edit"),
                    quote(&single[1..])
                )),
            Method::public("update")
                .param(format!("{} $request", update_request))
                .param(model_param.clone())
                .returns(redirect.clone())
                .line(format!("{}->update({});", single, data))
                .blank()
                .line(back_to_index.clone()),
            Method::public("destroy")
                .param(model_param)
                .returns(redirect)
                .line(format!("{}->delete();", single))
                .blank()
                .line(back_to_index),
        ];
        for method in methods {
            self.file.class.method(method);
        }
    }

    // ========================================================================
    // Invokable
    // ========================================================================

    fn invokable_action(&mut self) {
        let request = self.file.import(HTTP_REQUEST);
        let view = self.file.import(VIEW);
        let data = PhpValue::str_map([(
            self.many[1..].to_string(),
            PhpValue::raw(format!("{}::paginate()", self.model)),
        )]);
        let method = Method::public("__invoke")
            .param(format!("{} $request", request))
            .returns(view)
            .line(format!("return view({}, {});", self.view("index"), data.render()));
        self.file.class.method(method);
    }
}

// ============================================================================
// Tests
// ============================================================================
