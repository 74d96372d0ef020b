//! Template matching and raw field capture
//!
//! Templates are tried in catalog order and the first match wins. There is
//! no scoring between templates: a catalog lists the most specific ones
//! first, and that order is the only tie-break.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Field;

/// A compiled bank message template
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    bank: String,
    regex: Regex,
    fields: Vec<Field>,
    samples: Vec<String>,
}

impl Template {
    /// Compile a template, checking every named group against the field vocabulary
    pub fn compile(name: &str, bank: &str, pattern: &str, samples: Vec<String>) -> Result<Self> {
        let regex = Regex::new(pattern)?;

        let mut fields = Vec::new();
        for group in regex.capture_names().flatten() {
            let field = group.parse::<Field>().map_err(|_| {
                Error::Catalog(format!(
                    "template {} captures unknown field {:?}",
                    name, group
                ))
            })?;
            fields.push(field);
        }

        Ok(Self {
            name: name.to_string(),
            bank: bank.to_string(),
            regex,
            fields,
            samples,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bank the template was written for (informational)
    pub fn bank(&self) -> &str {
        &self.bank
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Fields this template can capture
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Match against a message, returning the captured fields
    pub fn captures(&self, text: &str) -> Option<FieldMap> {
        let caps = self.regex.captures(text)?;

        let mut map = FieldMap::empty(&self.name);
        for field in &self.fields {
            if let Some(m) = caps.name(field.as_str()) {
                map.values.insert(*field, m.as_str().to_string());
            }
        }
        Some(map)
    }
}

/// Raw captures from the winning template
///
/// Every field is present; an empty string means "not captured".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    template: String,
    values: BTreeMap<Field, String>,
}

impl FieldMap {
    fn empty(template: &str) -> Self {
        Self {
            template: template.to_string(),
            values: Field::all().iter().map(|f| (*f, String::new())).collect(),
        }
    }

    /// Name of the template that produced this map
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Non-empty captures, in field order
    pub fn captured(&self) -> impl Iterator<Item = (Field, &str)> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(f, v)| (*f, v.as_str()))
    }
}

/// Run the templates in order and return the first match
pub fn extract(templates: &[Template], text: &str) -> Option<FieldMap> {
    for template in templates {
        if let Some(fields) = template.captures(text) {
            debug!(template = %template.name(), "Template matched");
            return Some(fields);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str, pattern: &str) -> Template {
        Template::compile(name, "Test", pattern, vec![]).unwrap()
    }

    #[test]
    fn test_compile_rejects_unknown_field() {
        let result = Template::compile("bad", "Test", r"(?P<merchant>\w+)", vec![]);
        match result {
            Err(Error::Catalog(msg)) => {
                assert!(msg.contains("bad"));
                assert!(msg.contains("merchant"));
            }
            other => panic!("expected catalog error, got {:?}", other),
        }
    }

    #[test]
    fn test_compile_rejects_invalid_regex() {
        let result = Template::compile("bad", "Test", r"(?P<amount>[\d", vec![]);
        assert!(matches!(result, Err(Error::Regex(_))));
    }

    #[test]
    fn test_unnamed_groups_ignored() {
        let t = template("t", r"Rs (?P<amount>[\d.]+) (?:to|and) (?P<receiver>\w+)");
        assert_eq!(t.fields(), &[Field::Amount, Field::Receiver]);

        let fields = t.captures("Rs 10.00 and bob").unwrap();
        assert_eq!(fields.get(Field::Amount), "10.00");
        assert_eq!(fields.get(Field::Receiver), "bob");
    }

    #[test]
    fn test_uncaptured_fields_are_empty() {
        let t = template(
            "t",
            r"INR (?P<amount>[\d,.]+) (?P<txtype>\w+)(?: at (?P<receiver>\w+))?",
        );
        let fields = t.captures("INR 5.00 spent").unwrap();

        assert_eq!(fields.template(), "t");
        assert_eq!(fields.get(Field::Amount), "5.00");
        assert_eq!(fields.get(Field::TxType), "spent");
        assert_eq!(fields.get(Field::Receiver), "");
        assert_eq!(fields.get(Field::Balance), "");
        assert_eq!(
            fields.captured().collect::<Vec<_>>(),
            vec![(Field::Amount, "5.00"), (Field::TxType, "spent")]
        );
    }

    #[test]
    fn test_first_match_wins() {
        let general = template("general", r"INR (?P<amount>[\d.]+)");
        let specific = template("specific", r"INR (?P<amount>[\d.]+) (?P<txtype>spent)");
        let text = "INR 12.50 spent on card";

        // Catalog order is precedence, even when a later template captures more
        let fields = extract(&[general.clone(), specific.clone()], text).unwrap();
        assert_eq!(fields.template(), "general");
        assert_eq!(fields.get(Field::TxType), "");

        let fields = extract(&[specific, general], text).unwrap();
        assert_eq!(fields.template(), "specific");
        assert_eq!(fields.get(Field::TxType), "spent");
    }

    #[test]
    fn test_no_template_matches() {
        let templates = [template("t", r"INR (?P<amount>[\d.]+)")];
        assert!(extract(&templates, "Rs 12.50 spent").is_none());
        assert!(extract(&[], "INR 12.50").is_none());
    }
}
