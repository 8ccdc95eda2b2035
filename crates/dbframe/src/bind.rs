//! Parameter binders.
//!
//! A binder pushes named values into a statement before it runs. Binders
//! hold borrowed or owned values and never keep a reference to the target.

use crate::dataset::ParamSink;
use crate::dml::ObjectDescriptor;
use crate::error::OrmResult;
use crate::value::Value;

/// Binds parameters into `D`.
pub trait Binder<D: ?Sized> {
    fn bind(&self, target: &mut D) -> OrmResult<()>;
}

impl<D, F> Binder<D> for F
where
    D: ?Sized,
    F: Fn(&mut D) -> OrmResult<()>,
{
    fn bind(&self, target: &mut D) -> OrmResult<()> {
        self(target)
    }
}

/// One named value.
#[derive(Debug, Clone, PartialEq)]
pub struct BindValue {
    name: String,
    value: Value,
}

impl BindValue {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl<D: ?Sized + ParamSink> Binder<D> for BindValue {
    fn bind(&self, target: &mut D) -> OrmResult<()> {
        target.bind_value(&self.name, self.value.clone())
    }
}

/// Entities that can expose their fields as named values.
///
/// Usually derived with `#[derive(Table)]`. Field names are the bare column
/// names; parameter names come from the descriptor.
pub trait BindFields {
    fn field_values(&self) -> Vec<(&'static str, Value)>;
}

/// Binds every field of an entity, named through an [`ObjectDescriptor`].
///
/// With the default naming this matches the placeholders produced by
/// [`dml::insert`](crate::dml::insert) and friends for the same descriptor.
pub struct BindObject<'a, T: ?Sized> {
    object: &'a T,
    descriptor: &'a dyn ObjectDescriptor,
}

impl<'a, T: ?Sized> BindObject<'a, T> {
    pub fn new(object: &'a T, descriptor: &'a dyn ObjectDescriptor) -> Self {
        Self { object, descriptor }
    }
}

impl<D, T> Binder<D> for BindObject<'_, T>
where
    D: ?Sized + ParamSink,
    T: ?Sized + BindFields,
{
    fn bind(&self, target: &mut D) -> OrmResult<()> {
        for (field, value) in self.object.field_values() {
            target.bind_value(&self.descriptor.parameter_name(field), value)?;
        }
        Ok(())
    }
}

/// Runs several binders in order, stopping at the first failure.
pub struct Binders<'a, D: ?Sized> {
    binders: Vec<Box<dyn Binder<D> + 'a>>,
}

impl<'a, D: ?Sized> Binders<'a, D> {
    pub fn new() -> Self {
        Self {
            binders: Vec::new(),
        }
    }

    pub fn with(mut self, binder: impl Binder<D> + 'a) -> Self {
        self.push(binder);
        self
    }

    pub fn push(&mut self, binder: impl Binder<D> + 'a) {
        self.binders.push(Box::new(binder));
    }

    pub fn len(&self) -> usize {
        self.binders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binders.is_empty()
    }
}

impl<D: ?Sized> Default for Binders<'_, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ?Sized> Binder<D> for Binders<'_, D> {
    fn bind(&self, target: &mut D) -> OrmResult<()> {
        for binder in &self.binders {
            binder.bind(target)?;
        }
        Ok(())
    }
}
