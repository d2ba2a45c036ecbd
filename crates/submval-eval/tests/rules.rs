use submval_core::{PropertyTable, SchemaProperty, Tristate};
use submval_eval::{
    Finding, RecordTable, ReportHeader, Severity, Submission, ValidateOptions, ValidationEngine,
    ValidationOutcome, render_report,
};

fn prop(node: &str, name: &str, property_type: &str) -> SchemaProperty {
    SchemaProperty {
        node: node.to_string(),
        property: name.to_string(),
        description: String::new(),
        property_type: property_type.parse().expect("canonical type"),
        allowed_values: Vec::new(),
        required: Tristate::Unknown,
        is_key: Tristate::Unknown,
        cde_code: None,
    }
}

fn enum_prop(node: &str, name: &str, property_type: &str, values: &[&str]) -> SchemaProperty {
    let mut prop = prop(node, name, property_type);
    prop.allowed_values = values.iter().map(|value| value.to_string()).collect();
    prop
}

fn table(file_name: &str, raw: &str) -> RecordTable {
    RecordTable::from_reader(file_name, raw.as_bytes()).expect("load table")
}

fn run(schema: Vec<SchemaProperty>, tables: Vec<RecordTable>) -> ValidationOutcome {
    run_with(schema, tables, ValidateOptions::default())
}

fn run_with(
    schema: Vec<SchemaProperty>,
    tables: Vec<RecordTable>,
    options: ValidateOptions,
) -> ValidationOutcome {
    let schema = PropertyTable::new(schema).expect("valid schema");
    let submission = Submission::from_tables("submission", tables);
    ValidationEngine::new(options).run(&schema, &submission)
}

fn finding<'a>(outcome: &'a ValidationOutcome, rule: &str, property: &str) -> &'a Finding {
    outcome
        .reports
        .iter()
        .find(|report| report.rule == rule)
        .and_then(|report| {
            report
                .sections
                .iter()
                .flat_map(|section| &section.findings)
                .find(|finding| finding.property == property)
        })
        .unwrap_or_else(|| panic!("no {rule} finding for {property}"))
}

fn findings_for<'a>(outcome: &'a ValidationOutcome, rule: &str) -> Vec<&'a Finding> {
    outcome
        .reports
        .iter()
        .filter(|report| report.rule == rule)
        .flat_map(|report| &report.sections)
        .flat_map(|section| &section.findings)
        .collect()
}

#[test]
fn required_property_reports_blank_rows_with_offset() {
    let mut sample_id = prop("sample", "sample_id", "string");
    sample_id.required = Tristate::True;
    let outcome = run(
        vec![sample_id],
        vec![table(
            "sample.tsv",
            "type\tsample_id\nsample\tS1\nsample\tS2\nsample\t\n",
        )],
    );

    let found = finding(&outcome, "required_properties", "sample_id");
    assert_eq!(found.severity, Severity::Error);
    assert_eq!(found.detail, "4");
}

#[test]
fn required_property_absent_from_file_is_a_notice() {
    let mut sample_id = prop("sample", "sample_id", "string");
    sample_id.required = Tristate::True;
    let outcome = run(
        vec![sample_id],
        vec![table("sample.tsv", "type\tnotes\nsample\tx\n")],
    );

    let section = &outcome.reports[0].sections[0];
    assert_eq!(section.notices.len(), 1);
    assert_eq!(section.notices[0].severity, Severity::Error);
    assert!(section.notices[0].message.contains("[sample_id]"));
}

#[test]
fn required_column_without_rows_passes() {
    let mut sample_id = prop("sample", "sample_id", "string");
    sample_id.required = Tristate::True;
    let empty = RecordTable::from_rows(
        "sample.tsv",
        "sample",
        vec!["type".to_string(), "sample_id".to_string()],
        Vec::new(),
    )
    .expect("empty table");

    let outcome = run(vec![sample_id], vec![empty]);
    let found = finding(&outcome, "required_properties", "sample_id");
    assert_eq!(found.severity, Severity::Pass);
    assert!(found.detail.is_empty());
}

#[test]
fn unknown_required_signal_is_not_required() {
    let mut notes = prop("sample", "notes", "string");
    notes.required = Tristate::Unknown;
    let outcome = run(
        vec![notes],
        vec![table("sample.tsv", "type\tnotes\nsample\t\n")],
    );
    assert!(findings_for(&outcome, "required_properties").is_empty());
}

#[test]
fn node_type_missing_from_schema_is_warned() {
    let outcome = run(
        vec![prop("study", "study_id", "string")],
        vec![table("sample.tsv", "type\tsample_id\nsample\tS1\n")],
    );
    let notices = &outcome.reports[0].sections[0].notices;
    assert_eq!(notices[0].severity, Severity::Warning);
    assert!(notices[0].message.contains("[sample]"));
}

#[test]
fn whitespace_reports_padded_rows_and_skips_blank_columns() {
    let outcome = run(
        vec![prop("sample", "sample_id", "string")],
        vec![table(
            "sample.tsv",
            "type\tsample_id\tnotes\nsample\tS1 \t\nsample\tS2\t\nsample\t S3\t\n",
        )],
    );

    let findings = findings_for(&outcome, "whitespace");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].property, "sample_id");
    assert_eq!(findings[0].severity, Severity::Error);
    assert_eq!(findings[0].detail, "2,4");
}

#[test]
fn soft_enum_warns_and_strict_enum_errors() {
    let raw = "type\tsite\nsample\tA\nsample\tC\n";

    let soft = run(
        vec![enum_prop("sample", "site", "string;enum", &["A", "B"])],
        vec![table("sample.tsv", raw)],
    );
    let found = finding(&soft, "terms_and_value_sets", "site");
    assert_eq!(found.severity, Severity::Warning);
    assert_eq!(found.note.as_deref(), Some("free strings allowed"));
    assert!(found.detail.contains('C'));

    let strict = run(
        vec![enum_prop("sample", "site", "enum", &["A", "B"])],
        vec![table("sample.tsv", raw)],
    );
    let found = finding(&strict, "terms_and_value_sets", "site");
    assert_eq!(found.severity, Severity::Error);
    assert_eq!(found.note.as_deref(), Some("unrecognized value"));
    assert_eq!(found.detail, "[C]");
}

#[test]
fn array_enum_splits_on_commons_delimiter() {
    let outcome = run(
        vec![enum_prop("sample", "grades", "array[enum]", &["A", "B"])],
        vec![table(
            "sample.tsv",
            "type\tgrades\nsample\tA;Z\nsample\tB\nsample\tZ;A\n",
        )],
    );
    let found = finding(&outcome, "terms_and_value_sets", "grades");
    assert_eq!(found.severity, Severity::Error);
    assert_eq!(found.detail, "[Z]");
}

#[test]
fn array_enum_uses_configured_delimiter() {
    let options = ValidateOptions {
        delimiter: '|',
        ..ValidateOptions::default()
    };
    let outcome = run_with(
        vec![enum_prop("sample", "grades", "array[enum]", &["A", "B"])],
        vec![table("sample.tsv", "type\tgrades\nsample\tA|B\n")],
        options,
    );
    assert_eq!(
        finding(&outcome, "terms_and_value_sets", "grades").severity,
        Severity::Pass
    );
}

#[test]
fn numeric_reports_unparseable_rows() {
    let outcome = run(
        vec![
            prop("sample", "age", "integer"),
            prop("sample", "weight", "number"),
        ],
        vec![table(
            "sample.tsv",
            "type\tage\tweight\nsample\t12\t4.5\nsample\t12.5\t\nsample\tNA\theavy\n",
        )],
    );

    let age = finding(&outcome, "numeric_types", "age");
    assert_eq!(age.severity, Severity::Error);
    assert_eq!(age.detail, "3");

    let weight = finding(&outcome, "numeric_types", "weight");
    assert_eq!(weight.severity, Severity::Error);
    assert_eq!(weight.detail, "4");
}

#[test]
fn blank_columns_never_fail() {
    let mut key = prop("sample", "sample_id", "string");
    key.is_key = Tristate::True;
    let outcome = run(
        vec![
            key,
            prop("sample", "age", "integer"),
            enum_prop("sample", "site", "enum", &["A"]),
        ],
        vec![table(
            "sample.tsv",
            "type\tsample_id\tage\tsite\nsample\tNA\t\tn/a\nsample\t\tN/A\t\n",
        )],
    );

    for (rule, property) in [
        ("numeric_types", "age"),
        ("terms_and_value_sets", "site"),
        ("unique_keys", "sample_id"),
    ] {
        assert_eq!(finding(&outcome, rule, property).severity, Severity::Empty);
    }
    assert!(findings_for(&outcome, "whitespace").is_empty());
}

#[test]
fn cross_link_values_must_exist_in_parent() {
    let study = "type\tstudy_id\nstudy\tS1\nstudy\tS2\n";
    let schema = || vec![prop("study", "study_id", "string")];

    let broken = run(
        schema(),
        vec![
            table("study.tsv", study),
            table("sample.tsv", "type\tstudy.study_id\nsample\tS1\nsample\tS9\n"),
        ],
    );
    let found = finding(&broken, "cross_links", "study.study_id");
    assert_eq!(found.severity, Severity::Error);
    assert_eq!(found.detail, "S9");

    let fixed = run(
        schema(),
        vec![
            table("study.tsv", study),
            table("sample.tsv", "type\tstudy.study_id\nsample\tS1\nsample\tS2\n"),
        ],
    );
    assert_eq!(
        finding(&fixed, "cross_links", "study.study_id").severity,
        Severity::Pass
    );
}

#[test]
fn cross_link_row_coverage_notices() {
    let outcome = run(
        vec![prop("study", "study_id", "string")],
        vec![
            table("study.tsv", "type\tstudy_id\nstudy\tS1\n"),
            table("case.tsv", "type\tcase_id\ncase\tC1\n"),
            table(
                "sample.tsv",
                "type\tstudy.study_id\tcase.case_id\nsample\tS1\t\nsample\t\t\nsample\tS1\tC1\n",
            ),
        ],
    );

    let report = outcome
        .reports
        .iter()
        .find(|report| report.rule == "cross_links")
        .expect("cross links report");
    let sample = report
        .sections
        .iter()
        .find(|section| section.node == "sample")
        .expect("sample section");
    assert_eq!(sample.notices.len(), 2);
    assert_eq!(sample.notices[0].severity, Severity::Error);
    assert!(sample.notices[0].message.contains("row 3 contains ZERO links"));
    assert_eq!(sample.notices[1].severity, Severity::Warning);
    assert!(sample.notices[1].message.contains("row 4 contains multiple links"));
}

#[test]
fn cross_link_to_missing_parent_file_is_a_finding() {
    let outcome = run(
        vec![prop("sample", "sample_id", "string")],
        vec![table(
            "sample.tsv",
            "type\tsample_id\tstudy.study_id\tcase.case_id\nsample\tX1\tS1\t\n",
        )],
    );

    let missing = finding(&outcome, "cross_links", "study.study_id");
    assert_eq!(missing.severity, Severity::Error);
    assert_eq!(missing.note.as_deref(), Some("File for [study] not found"));
    assert_eq!(
        finding(&outcome, "cross_links", "case.case_id").severity,
        Severity::Empty
    );
}

#[test]
fn cross_link_parent_name_whitespace_is_trimmed() {
    let outcome = run(
        vec![prop("study", "study_id", "string")],
        vec![
            table("study.tsv", "type\tstudy_id\nstudy\tS1\n"),
            table("sample.tsv", "type\t study.study_id\nsample\tS1\n"),
        ],
    );

    assert_eq!(
        finding(&outcome, "cross_links", " study.study_id").severity,
        Severity::Pass
    );
    let report = outcome
        .reports
        .iter()
        .find(|report| report.rule == "cross_links")
        .expect("cross links report");
    let sample = report
        .sections
        .iter()
        .find(|section| section.node == "sample")
        .expect("sample section");
    let notice = sample
        .notices
        .iter()
        .find(|notice| notice.message.contains("has whitespace in its parent node name"))
        .expect("whitespace notice");
    assert_eq!(notice.severity, Severity::Warning);
}

#[test]
fn cross_link_to_missing_parent_key_is_a_finding() {
    let outcome = run(
        vec![prop("study", "study_name", "string")],
        vec![
            table("study.tsv", "type\tstudy_name\nstudy\tfirst\n"),
            table("sample.tsv", "type\tstudy.study_id\nsample\tS1\n"),
        ],
    );

    let missing = finding(&outcome, "cross_links", "study.study_id");
    assert_eq!(missing.severity, Severity::Error);
    assert_eq!(
        missing.note.as_deref(),
        Some("property [study_id] not found in parent file")
    );
}

#[test]
fn cross_link_against_large_parent() {
    let rows = 50_000;
    let mut study = String::from("type\tstudy_id\n");
    let mut sample = String::from("type\tstudy.study_id\n");
    for i in 0..rows {
        study.push_str(&format!("study\tS{i}\n"));
        sample.push_str(&format!("sample\tS{}\n", rows - 1 - i));
    }
    sample.push_str("sample\tmissing\n");

    let outcome = run(
        vec![prop("study", "study_id", "string")],
        vec![table("study.tsv", &study), table("sample.tsv", &sample)],
    );
    let found = finding(&outcome, "cross_links", "study.study_id");
    assert_eq!(found.severity, Severity::Error);
    assert_eq!(found.detail, "missing");
}

#[test]
fn duplicate_node_types_abort_only_cross_links() {
    let outcome = run(
        vec![prop("sample", "sample_id", "string")],
        vec![
            table("a.tsv", "type\tsample_id\nsample\tX1\n"),
            table("b.tsv", "type\tsample_id\nsample\tX2 \n"),
        ],
    );

    let cross = outcome
        .reports
        .iter()
        .find(|report| report.rule == "cross_links")
        .expect("cross links report");
    assert!(cross.aborted.is_some());
    assert!(cross.sections.is_empty());
    assert_eq!(findings_for(&outcome, "whitespace").len(), 1);
    assert!(outcome.summary.has_structural_problems());
}

#[test]
fn unique_key_lists_repeated_values() {
    let mut key = prop("sample", "sample_id", "string");
    key.is_key = Tristate::True;

    let repeated = run(
        vec![key.clone()],
        vec![table("sample.tsv", "type\tsample_id\nsample\tk1\nsample\tk1\nsample\tk2\n")],
    );
    let found = finding(&repeated, "unique_keys", "sample_id");
    assert_eq!(found.severity, Severity::Error);
    assert_eq!(found.detail, "k1");

    let unique = run(
        vec![key],
        vec![table("sample.tsv", "type\tsample_id\nsample\tk1\nsample\tk2\nsample\tk3\n")],
    );
    assert_eq!(
        finding(&unique, "unique_keys", "sample_id").severity,
        Severity::Pass
    );
}

#[test]
fn unique_key_missing_from_file_is_a_finding() {
    let mut key = prop("sample", "sample_id", "string");
    key.is_key = Tristate::True;

    let outcome = run(
        vec![key, prop("sample", "sample_name", "string")],
        vec![table("sample.tsv", "type\tsample_name\nsample\tfirst\n")],
    );
    let missing = finding(&outcome, "unique_keys", "sample_id");
    assert_eq!(missing.severity, Severity::Error);
    assert_eq!(missing.note.as_deref(), Some("not found in file"));
}

#[test]
fn unique_key_scan_over_many_rows() {
    let mut key = prop("sample", "sample_id", "string");
    key.is_key = Tristate::True;

    let mut raw = String::from("type\tsample_id\n");
    for i in 0..100_000 {
        raw.push_str(&format!("sample\tk{i}\n"));
    }
    raw.push_str("sample\tk99999\n");

    let outcome = run(vec![key], vec![table("sample.tsv", &raw)]);
    let found = finding(&outcome, "unique_keys", "sample_id");
    assert_eq!(found.severity, Severity::Error);
    assert_eq!(found.detail, "k99999");
}

#[test]
fn node_without_key_property_is_warned() {
    let outcome = run(
        vec![prop("sample", "sample_id", "string")],
        vec![table("sample.tsv", "type\tsample_id\nsample\tk1\n")],
    );
    let report = outcome
        .reports
        .iter()
        .find(|report| report.rule == "unique_keys")
        .expect("unique keys report");
    let notice = &report.sections[0].notices[0];
    assert_eq!(notice.severity, Severity::Warning);
    assert_eq!(notice.message, "node sample file contains no Key id property");
}

#[test]
fn report_text_is_deterministic() {
    let build = |parallel: bool| {
        let mut key = prop("sample", "sample_id", "string");
        key.is_key = Tristate::True;
        key.required = Tristate::True;
        let options = ValidateOptions {
            parallel,
            ..ValidateOptions::default()
        };
        let outcome = run_with(
            vec![
                prop("study", "study_id", "string"),
                key,
                enum_prop("sample", "site", "array[string;enum]", &["A", "B"]),
                prop("sample", "age", "number"),
            ],
            vec![
                table("study.tsv", "type\tstudy_id\nstudy\tS1\n"),
                table(
                    "sample.tsv",
                    "type\tsample_id\tsite\tage\tstudy.study_id\nsample\tk1\tA;Q;R\tx\tS1\nsample\tk1\tR;Q\t3\tS7\n",
                ),
            ],
            options,
        );
        let header = ReportHeader {
            report_path: "out/report.txt".to_string(),
            folder: "submission".to_string(),
            schema_files: vec![("Data dictionary file".to_string(), "dict.tsv".to_string())],
            model_tag: Some("1.0.0".to_string()),
        };
        render_report(&header, &outcome)
    };

    let first = build(true);
    assert_eq!(first, build(true));
    assert_eq!(first, build(false));
    assert!(first.contains("[Q], [R]"));

    let order = [
        "Required Properties Check",
        "Whitespace Check",
        "Terms and Value Sets Check",
        "Numeric and Integer Check",
        "Cross Links Check",
        "Unique Key Value Check",
    ]
    .map(|title| first.find(&format!("#   {title}   #")).expect("section banner"));
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn summary_serializes_severity_counts() {
    let mut key = prop("sample", "sample_id", "string");
    key.is_key = Tristate::True;
    let outcome = run(
        vec![key],
        vec![table("sample.tsv", "type\tsample_id\nsample\tk1\nsample\tk1\n")],
    );

    assert_eq!(outcome.summary.count(Severity::Error), 1);
    let json = serde_json::to_value(&outcome.summary).expect("serialize summary");
    assert_eq!(json["severity_counts"]["ERROR"], 1);
    assert_eq!(json["files_loaded"][0], "sample.tsv");
    assert_eq!(
        json["schema_fingerprint"].as_str().map(str::len),
        Some(64)
    );
}
