//! Canonical ISO-9001 audit fields and schema gap analysis.
//!
//! Every audit checklist must capture the five fields in
//! [`ISO_CANONICAL_FIELDS`]. The gap of a template is the subset of that list
//! whose technical names (compared case-insensitively) are missing from the
//! template's active fields.

use std::collections::HashSet;

use crate::field::{FieldDefinition, NewField};
use crate::field_type::FieldType;
use crate::options::ChoiceOption;
use crate::types::DbId;

/// ISO section tag stamped on gap-filled fields.
pub const ISO_GAP_SECTION: &str = "evaluation";

/// ISO clause stamped on gap-filled fields (9.2, internal audit).
pub const ISO_GAP_CLAUSE: &str = "9.2";

/// One entry of the canonical field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalField {
    pub technical_name: &'static str,
    pub label: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub evidence_required: bool,
    pub sort_order: i32,
    /// `(label, value)` pairs.
    pub options: &'static [(&'static str, &'static str)],
}

impl CanonicalField {
    /// The field row that closes this part of the gap on `template_id`.
    pub fn to_new_field(&self, template_id: DbId) -> NewField {
        NewField {
            template_id,
            technical_name: self.technical_name.to_string(),
            label: self.label.to_string(),
            field_type: self.field_type,
            required: self.required,
            iso_section: ISO_GAP_SECTION.to_string(),
            iso_clause: Some(ISO_GAP_CLAUSE.to_string()),
            iso_subclause: None,
            evidence_required: self.evidence_required,
            sort_order: self.sort_order,
            active: true,
            options: self
                .options
                .iter()
                .map(|(label, value)| ChoiceOption::new(*label, *value))
                .collect(),
        }
    }
}

pub const ISO_CANONICAL_FIELDS: [CanonicalField; 5] = [
    CanonicalField {
        technical_name: "clausula_iso",
        label: "Cláusula ISO",
        field_type: FieldType::Text,
        required: true,
        evidence_required: false,
        sort_order: 1,
        options: &[],
    },
    CanonicalField {
        technical_name: "criterio_auditoria",
        label: "Criterio de auditoría",
        field_type: FieldType::Textarea,
        required: true,
        evidence_required: false,
        sort_order: 2,
        options: &[],
    },
    CanonicalField {
        technical_name: "evidencia_objetiva",
        label: "Evidencia objetiva",
        field_type: FieldType::Textarea,
        required: true,
        evidence_required: true,
        sort_order: 3,
        options: &[],
    },
    CanonicalField {
        technical_name: "resultado_auditoria",
        label: "Resultado de la auditoría",
        field_type: FieldType::Select,
        required: true,
        evidence_required: false,
        sort_order: 4,
        options: &[
            ("Conforme", "conforme"),
            ("No conforme", "no_conforme"),
            ("Observación", "observacion"),
        ],
    },
    CanonicalField {
        technical_name: "conclusion_auditoria",
        label: "Conclusión de la auditoría",
        field_type: FieldType::Textarea,
        required: true,
        evidence_required: false,
        sort_order: 5,
        options: &[],
    },
];

/// Canonical fields missing from `existing`, in canonical order.
///
/// Callers pass the template's active fields; inactive ones do not count.
pub fn missing_canonical_fields(existing: &[FieldDefinition]) -> Vec<&'static CanonicalField> {
    let present: HashSet<String> = existing
        .iter()
        .map(|f| f.technical_name.trim().to_lowercase())
        .collect();

    ISO_CANONICAL_FIELDS
        .iter()
        .filter(|c| !present.contains(&c.technical_name.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn field(name: &str) -> FieldDefinition {
        FieldDefinition {
            id: 1,
            template_id: 7,
            technical_name: name.to_string(),
            label: name.to_string(),
            field_type: FieldType::Text,
            required: false,
            iso_section: "general".to_string(),
            iso_clause: None,
            iso_subclause: None,
            evidence_required: false,
            sort_order: 0,
            active: true,
            options: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_template_misses_all_five() {
        let gap = missing_canonical_fields(&[]);
        let names: Vec<_> = gap.iter().map(|c| c.technical_name).collect();
        assert_eq!(
            names,
            vec![
                "clausula_iso",
                "criterio_auditoria",
                "evidencia_objetiva",
                "resultado_auditoria",
                "conclusion_auditoria"
            ]
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let existing: Vec<_> = [
            "Clausula_ISO",
            "CRITERIO_AUDITORIA",
            "Evidencia_Objetiva",
            "resultado_AUDITORIA",
            "Conclusion_Auditoria",
        ]
        .iter()
        .map(|n| field(n))
        .collect();
        assert!(missing_canonical_fields(&existing).is_empty());
    }

    #[test]
    fn partial_template_misses_the_rest() {
        let gap = missing_canonical_fields(&[field("clausula_iso"), field("otro_campo")]);
        assert_eq!(gap.len(), 4);
        assert_eq!(gap[0].technical_name, "criterio_auditoria");
    }

    #[test]
    fn gap_field_carries_iso_metadata() {
        let new_field = ISO_CANONICAL_FIELDS[3].to_new_field(9);
        assert_eq!(new_field.template_id, 9);
        assert_eq!(new_field.iso_section, "evaluation");
        assert_eq!(new_field.iso_clause.as_deref(), Some("9.2"));
        assert_eq!(new_field.field_type, FieldType::Select);
        let values: Vec<_> = new_field.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["conforme", "no_conforme", "observacion"]);
    }

    #[test]
    fn evidence_flag_only_on_objective_evidence() {
        let flagged: Vec<_> = ISO_CANONICAL_FIELDS
            .iter()
            .filter(|c| c.evidence_required)
            .map(|c| c.technical_name)
            .collect();
        assert_eq!(flagged, vec!["evidencia_objetiva"]);
        assert!(ISO_CANONICAL_FIELDS.iter().all(|c| c.required));
    }
}
