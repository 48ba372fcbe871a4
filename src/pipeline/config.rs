use http::Method;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use super::context::EntityContext;
use super::error::PipelineError;
use crate::request::Request;
use crate::store::{Record, RecordQuery};

/// Hook run against a record: `before_create`, `after_create`, `after_fetch`.
pub type RecordHook<R> = Box<dyn Fn(&mut R, &Request) -> anyhow::Result<()> + Send + Sync>;

/// Hook run against the lookup query before execution. May rewrite the query
/// and may enforce the primary key through the context.
pub type QueryHook<R> = Box<
    dyn Fn(
            Box<dyn RecordQuery<R>>,
            &Request,
            &mut EntityContext,
        ) -> anyhow::Result<Box<dyn RecordQuery<R>>>
        + Send
        + Sync,
>;

/// The allow-list: given the merged request parameters and the HTTP method,
/// returns the fields that may be written onto a record.
pub type AllowedFields =
    Box<dyn Fn(&Map<String, Value>, &Method) -> Map<String, Value> + Send + Sync>;

#[derive(Default)]
struct EntityHooks<R> {
    before_create: Option<RecordHook<R>>,
    after_create: Option<RecordHook<R>>,
    before_fetch: Option<QueryHook<R>>,
    after_fetch: Option<RecordHook<R>>,
    allowed_fields: Option<AllowedFields>,
}

/// Declarative, request-independent configuration of an entity route.
///
/// Built once per route definition through [`EntityConfig::builder`] and
/// shared with every request the route serves. Holds the attribute name the
/// record is injected under, the request parameter carrying the primary key,
/// the hydration flag, and the optional hooks.
pub struct EntityConfig<R: Record> {
    attribute: Arc<str>,
    pk_param: Arc<str>,
    hydrate: bool,
    hooks: EntityHooks<R>,
}

impl<R: Record> EntityConfig<R> {
    #[must_use]
    pub fn builder() -> EntityConfigBuilder<R> {
        EntityConfigBuilder::new()
    }

    /// Request attribute name the resulting record(s) are stored under.
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Request parameter name holding the primary key.
    #[must_use]
    pub fn pk_param(&self) -> &str {
        &self.pk_param
    }

    /// Whether request fields are merged into the record.
    #[must_use]
    pub fn hydrates(&self) -> bool {
        self.hydrate
    }

    /// The allow-listed subset of `params` for this request method.
    ///
    /// Without an allow-list callback nothing is allowed; the builder rejects
    /// that combination when hydration is enabled.
    #[must_use]
    pub fn allowed_fields(&self, params: &Map<String, Value>, method: &Method) -> Map<String, Value> {
        match &self.hooks.allowed_fields {
            Some(allow) => allow(params, method),
            None => Map::new(),
        }
    }

    pub(crate) fn run_before_create(&self, record: &mut R, req: &Request) -> Result<(), PipelineError> {
        Self::run_record_hook(&self.hooks.before_create, "before_create", record, req)
    }

    pub(crate) fn run_after_create(&self, record: &mut R, req: &Request) -> Result<(), PipelineError> {
        Self::run_record_hook(&self.hooks.after_create, "after_create", record, req)
    }

    pub(crate) fn run_after_fetch(&self, record: &mut R, req: &Request) -> Result<(), PipelineError> {
        Self::run_record_hook(&self.hooks.after_fetch, "after_fetch", record, req)
    }

    pub(crate) fn run_before_fetch(
        &self,
        query: Box<dyn RecordQuery<R>>,
        req: &Request,
        ctx: &mut EntityContext,
    ) -> Result<Box<dyn RecordQuery<R>>, PipelineError> {
        match &self.hooks.before_fetch {
            Some(hook) => hook(query, req, ctx).map_err(|source| PipelineError::Hook {
                entity: R::ENTITY,
                stage: "before_fetch",
                source,
            }),
            None => Ok(query),
        }
    }

    fn run_record_hook(
        hook: &Option<RecordHook<R>>,
        stage: &'static str,
        record: &mut R,
        req: &Request,
    ) -> Result<(), PipelineError> {
        match hook {
            Some(hook) => hook(record, req).map_err(|source| PipelineError::Hook {
                entity: R::ENTITY,
                stage,
                source,
            }),
            None => Ok(()),
        }
    }
}

impl<R: Record> fmt::Debug for EntityConfig<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityConfig")
            .field("attribute", &self.attribute)
            .field("pk_param", &self.pk_param)
            .field("hydrate", &self.hydrate)
            .finish_non_exhaustive()
    }
}

/// Builder for [`EntityConfig`]; validation happens in [`build`](Self::build)
/// so misconfigured routes fail at registration, not per request.
pub struct EntityConfigBuilder<R: Record> {
    attribute: Option<String>,
    pk_param: String,
    hydrate: bool,
    hooks: EntityHooks<R>,
}

impl<R: Record> Default for EntityConfigBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> EntityConfigBuilder<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            attribute: None,
            pk_param: "id".to_string(),
            hydrate: false,
            hooks: EntityHooks::default(),
        }
    }

    /// Attribute name to store the record(s) under. Defaults to the entity
    /// name.
    #[must_use]
    pub fn inject_as(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Request parameter name holding the primary key. Defaults to `id`.
    #[must_use]
    pub fn pk_param(mut self, name: impl Into<String>) -> Self {
        self.pk_param = name.into();
        self
    }

    /// Enable or disable hydration of record fields from request data.
    #[must_use]
    pub fn hydrate(mut self, hydrate: bool) -> Self {
        self.hydrate = hydrate;
        self
    }

    #[must_use]
    pub fn allowed_fields(
        mut self,
        allow: impl Fn(&Map<String, Value>, &Method) -> Map<String, Value> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.allowed_fields = Some(Box::new(allow));
        self
    }

    #[must_use]
    pub fn before_create(
        mut self,
        hook: impl Fn(&mut R, &Request) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.before_create = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn after_create(
        mut self,
        hook: impl Fn(&mut R, &Request) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.after_create = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn before_fetch(
        mut self,
        hook: impl Fn(
                Box<dyn RecordQuery<R>>,
                &Request,
                &mut EntityContext,
            ) -> anyhow::Result<Box<dyn RecordQuery<R>>>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.hooks.before_fetch = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn after_fetch(
        mut self,
        hook: impl Fn(&mut R, &Request) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.after_fetch = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> Result<EntityConfig<R>, ConfigError> {
        let attribute = self.attribute.unwrap_or_else(|| R::ENTITY.to_string());
        if attribute.is_empty() {
            return Err(ConfigError::EmptyAttributeName { entity: R::ENTITY });
        }
        if self.pk_param.is_empty() {
            return Err(ConfigError::EmptyKeyParameter { entity: R::ENTITY });
        }
        if self.hydrate && self.hooks.allowed_fields.is_none() {
            return Err(ConfigError::HydrationWithoutAllowList { entity: R::ENTITY });
        }
        Ok(EntityConfig {
            attribute: Arc::from(attribute.as_str()),
            pk_param: Arc::from(self.pk_param.as_str()),
            hydrate: self.hydrate,
            hooks: self.hooks,
        })
    }
}

/// Route configuration error, raised at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Hydration enabled without an allow-list callback. Hydrating with no
    /// allow-list would silently write nothing.
    HydrationWithoutAllowList { entity: &'static str },
    /// The attribute name to inject under is empty.
    EmptyAttributeName { entity: &'static str },
    /// The primary-key parameter name is empty.
    EmptyKeyParameter { entity: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HydrationWithoutAllowList { entity } => write!(
                f,
                "entity `{entity}`: hydration is enabled but no allowed_fields callback is set"
            ),
            ConfigError::EmptyAttributeName { entity } => {
                write!(f, "entity `{entity}`: attribute name must not be empty")
            }
            ConfigError::EmptyKeyParameter { entity } => {
                write!(f, "entity `{entity}`: primary-key parameter name must not be empty")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
