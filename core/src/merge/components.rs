//! Merging of the named component sections.
//!
//! Schemas, parameters, responses and security schemes all follow the same
//! rule: a name already present in the primary is kept and the incoming
//! entry is reported. Same-named entries are assumed to describe the same
//! thing; no deep comparison or renaming happens, since renaming would leave
//! the mixin's `$ref`s dangling.

use indexmap::IndexMap;
use tracing::debug;

use crate::{Components, Document, NamedValues, SkipCategory, Skipped};

#[derive(Debug, Clone, Copy)]
enum Section {
    Schemas,
    Parameters,
    Responses,
    SecuritySchemes,
}

impl Section {
    fn of(self, components: &Components) -> Option<&NamedValues> {
        match self {
            Section::Schemas => components.schemas.as_ref(),
            Section::Parameters => components.parameters.as_ref(),
            Section::Responses => components.responses.as_ref(),
            Section::SecuritySchemes => components.security_schemes.as_ref(),
        }
    }

    fn of_mut(self, components: &mut Components) -> &mut Option<NamedValues> {
        match self {
            Section::Schemas => &mut components.schemas,
            Section::Parameters => &mut components.parameters,
            Section::Responses => &mut components.responses,
            Section::SecuritySchemes => &mut components.security_schemes,
        }
    }

    fn category(self) -> SkipCategory {
        match self {
            Section::Schemas => SkipCategory::Schema,
            Section::Parameters => SkipCategory::Parameter,
            Section::Responses => SkipCategory::Response,
            Section::SecuritySchemes => SkipCategory::SecurityScheme,
        }
    }
}

pub(super) fn merge_security_schemes(
    primary: &mut Document,
    mixin: &Document,
    index: usize,
) -> Vec<Skipped> {
    merge_section(primary, mixin, index, Section::SecuritySchemes)
}

pub(super) fn merge_schemas(primary: &mut Document, mixin: &Document, index: usize) -> Vec<Skipped> {
    merge_section(primary, mixin, index, Section::Schemas)
}

pub(super) fn merge_parameters(
    primary: &mut Document,
    mixin: &Document,
    index: usize,
) -> Vec<Skipped> {
    merge_section(primary, mixin, index, Section::Parameters)
}

pub(super) fn merge_responses(
    primary: &mut Document,
    mixin: &Document,
    index: usize,
) -> Vec<Skipped> {
    merge_section(primary, mixin, index, Section::Responses)
}

fn merge_section(
    primary: &mut Document,
    mixin: &Document,
    index: usize,
    section: Section,
) -> Vec<Skipped> {
    let source = match mixin.components.as_ref().and_then(|c| section.of(c)) {
        Some(source) if !source.is_empty() => source,
        _ => return Vec::new(),
    };

    let target = section
        .of_mut(primary.components_mut())
        .get_or_insert_with(IndexMap::new);

    let mut skipped = Vec::new();
    for (name, value) in source {
        if target.contains_key(name) {
            debug!(mixin = index, section = ?section, name = %name, "component already defined");
            skipped.push(Skipped::new(index, section.category(), name.as_str()));
            continue;
        }
        target.insert(name.clone(), value.clone());
    }

    skipped
}
