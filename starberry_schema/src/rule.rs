//! Field-level validation rules.
//!
//! A [`Rule`] is immutable configuration plus a `validate` method. Each
//! variant is one kind of check. A [`RuleSet`] runs a list of them with a shared
//! connection predicate, the way a schema compiler applies the rules attached
//! to an argument that references fields by name (ordering, filters and so on).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::SchemaError;
use crate::predicate::{ConnectionPredicate, KindPredicate};
use crate::schema::{Schema, TypeDefinition};

/// Parameters bound by the caller for the current validation context.
pub type RuleParameters = HashMap<String, String>;

/// Result of a rule that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The referenced type exists and the check passed.
    Passed,
    /// The referenced type (or the parameter naming it) is missing, so the
    /// rule had nothing to check. Dangling references are left to other rules.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Rule {
    /// The field must exist on the referenced type and be a connection.
    IsConnection {
        #[serde(rename = "typeParameter")]
        type_parameter: String,
    },
    /// The field must exist on the referenced type.
    HasField {
        #[serde(rename = "typeParameter")]
        type_parameter: String,
    },
}

impl Rule {
    pub fn is_connection(type_parameter: impl Into<String>) -> Self {
        Self::IsConnection { type_parameter: type_parameter.into() }
    }

    pub fn has_field(type_parameter: impl Into<String>) -> Self {
        Self::HasField { type_parameter: type_parameter.into() }
    }

    /// Name of the parameter entry that holds the target type name.
    pub fn type_parameter(&self) -> &str {
        match self {
            Self::IsConnection { type_parameter } | Self::HasField { type_parameter } => {
                type_parameter
            }
        }
    }

    /// Validates `field_name` using [`KindPredicate`] to detect connections.
    pub fn validate(
        &self,
        schema: &Schema,
        field_name: &str,
        parameters: &RuleParameters,
    ) -> Result<RuleOutcome, SchemaError> {
        self.validate_with(&KindPredicate, schema, field_name, parameters)
    }

    #[instrument(skip(self, predicate, schema, parameters), fields(rule = %self), level = "debug")]
    pub fn validate_with(
        &self,
        predicate: &dyn ConnectionPredicate,
        schema: &Schema,
        field_name: &str,
        parameters: &RuleParameters,
    ) -> Result<RuleOutcome, SchemaError> {
        let Some(type_definition) = self.target_type(schema, parameters) else {
            debug!("referenced type not in schema, skipping");
            return Ok(RuleOutcome::Skipped);
        };

        let Some(field) = type_definition.get_field(field_name) else {
            let err = SchemaError::MissingField {
                type_name: type_definition.name.clone(),
                field_name: field_name.to_string(),
            };
            debug!(error = %err, "rule failed");
            return Err(err);
        };

        if let Self::IsConnection { .. } = self {
            if !predicate.is_connection(field) {
                let err = SchemaError::NotAConnection {
                    type_name: type_definition.name.clone(),
                    field_name: field_name.to_string(),
                };
                debug!(error = %err, "rule failed");
                return Err(err);
            }
        }

        Ok(RuleOutcome::Passed)
    }

    fn target_type<'s>(
        &self,
        schema: &'s Schema,
        parameters: &RuleParameters,
    ) -> Option<&'s TypeDefinition> {
        parameters
            .get(self.type_parameter())
            .and_then(|type_name| schema.get_type(type_name))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IsConnection { type_parameter } => write!(f, "isConnection({})", type_parameter),
            Self::HasField { type_parameter } => write!(f, "hasField({})", type_parameter),
        }
    }
}

/// An ordered list of rules sharing one connection predicate.
#[derive(Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    predicate: Arc<dyn ConnectionPredicate>,
}

impl RuleSet {
    /// Creates an empty rule set using [`KindPredicate`].
    pub fn new() -> Self {
        Self { rules: Vec::new(), predicate: Arc::new(KindPredicate) }
    }

    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self { rules: rules.into_iter().collect(), ..Self::new() }
    }

    /// Sets a custom connection predicate.
    pub fn predicate(mut self, predicate: Arc<dyn ConnectionPredicate>) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Runs every rule and returns all failures, in rule order.
    pub fn check(
        &self,
        schema: &Schema,
        field_name: &str,
        parameters: &RuleParameters,
    ) -> Vec<SchemaError> {
        self.rules
            .iter()
            .filter_map(|rule| {
                rule.validate_with(self.predicate.as_ref(), schema, field_name, parameters)
                    .err()
            })
            .collect()
    }

    /// Runs the rules in order and stops at the first failure.
    pub fn validate(
        &self,
        schema: &Schema,
        field_name: &str,
        parameters: &RuleParameters,
    ) -> Result<(), SchemaError> {
        for rule in &self.rules {
            rule.validate_with(self.predicate.as_ref(), schema, field_name, parameters)?;
        }
        Ok(())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet").field("rules", &self.rules).finish_non_exhaustive()
    }
}
