//! Trait abstractions for the collaborators a form delegates to

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

use crate::form::{Errors, Form};

/// Value produced by a submit handler
pub trait SubmitResult: Clone + PartialEq + Serialize + Send + Sync + 'static {}

impl<T> SubmitResult for T where T: Clone + PartialEq + Serialize + Send + Sync + 'static {}

/// Function-style validator: inspects the whole form and reports errors
#[async_trait]
pub trait FormValidator<R: SubmitResult>: Send + Sync {
    async fn validate(&self, form: &Form<R>) -> Result<Option<Errors>>;
}

#[async_trait]
impl<R, F, Fut> FormValidator<R> for F
where
    R: SubmitResult,
    F: Fn(Form<R>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<Errors>>> + Send,
{
    async fn validate(&self, form: &Form<R>) -> Result<Option<Errors>> {
        (self)(form.clone()).await
    }
}

/// Schema collaborator; the schema language itself lives outside this crate
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormSchema: Send + Sync {
    /// Validate a complete value tree
    async fn validate(&self, value: &Value) -> Result<Option<Errors>>;

    /// Produce a sanitized copy of the value tree (trimming, defaults, ...)
    async fn sanitize(&self, value: &Value) -> Result<Value>;
}

/// Submit handler; receives the form so it can read and write any state
#[async_trait]
pub trait FormHandler<R: SubmitResult>: Send + Sync {
    async fn handle(&self, form: &Form<R>) -> Result<Option<R>>;
}

#[async_trait]
impl<R, F, Fut> FormHandler<R> for F
where
    R: SubmitResult,
    F: Fn(Form<R>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<R>>> + Send,
{
    async fn handle(&self, form: &Form<R>) -> Result<Option<R>> {
        (self)(form.clone()).await
    }
}

pub type SchemaFactory<R> = Arc<dyn Fn(&Form<R>) -> Arc<dyn FormSchema> + Send + Sync>;

/// A schema, or a factory that builds one from the form it validates
pub enum SchemaSource<R: SubmitResult> {
    Schema(Arc<dyn FormSchema>),
    Factory(SchemaFactory<R>),
}

impl<R: SubmitResult> SchemaSource<R> {
    pub fn schema(schema: impl FormSchema + 'static) -> Self {
        SchemaSource::Schema(Arc::new(schema))
    }

    pub fn factory(
        factory: impl Fn(&Form<R>) -> Arc<dyn FormSchema> + Send + Sync + 'static,
    ) -> Self {
        SchemaSource::Factory(Arc::new(factory))
    }

    /// Resolve to a concrete schema for `form`
    pub fn resolve(&self, form: &Form<R>) -> Arc<dyn FormSchema> {
        match self {
            SchemaSource::Schema(schema) => Arc::clone(schema),
            SchemaSource::Factory(factory) => factory(form),
        }
    }

    pub(crate) fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (SchemaSource::Schema(a), SchemaSource::Schema(b)) => Arc::ptr_eq(a, b),
            (SchemaSource::Factory(a), SchemaSource::Factory(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<R: SubmitResult> Clone for SchemaSource<R> {
    fn clone(&self) -> Self {
        match self {
            SchemaSource::Schema(schema) => SchemaSource::Schema(Arc::clone(schema)),
            SchemaSource::Factory(factory) => SchemaSource::Factory(Arc::clone(factory)),
        }
    }
}

impl<R: SubmitResult> From<Arc<dyn FormSchema>> for SchemaSource<R> {
    fn from(schema: Arc<dyn FormSchema>) -> Self {
        SchemaSource::Schema(schema)
    }
}
