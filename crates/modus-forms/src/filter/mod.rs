//! A rule-based subject filter.
//!
//! [`SubjectFilter`] is the validation engine forms are usually paired with.
//! Rules are registered per field while a form type configures itself, and
//! the whole data set is checked at once on every [`SubjectFilter::apply`].
//!
//! The filter speaks both library API shapes the [`validator`](crate::validator)
//! adapters understand: the message-query shape and the failure-collection
//! shape.

pub mod failure;
pub mod rules;
mod subject;

pub use failure::{Failure, FailureCollection};
pub use subject::{RuleMode, RuleSpec, RuleSpecBuilder, SubjectFilter};
