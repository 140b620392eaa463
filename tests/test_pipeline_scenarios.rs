//! End-to-end pipeline scenarios over complete model documents.

use initsynth::table::DomainValue;
use initsynth::{pipeline, ModelDocument, INI_ID_COLUMN};

/// Two direct attributes (one shared across two guards), two derived
/// attributes (one with a fixed default), a compound guard, fairness
/// annotations, and a decision declaration.
const APPLICANT_MODEL: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmlns:xmi="http://www.omg.org/XMI"
         xmlns:UMLFairness="http://www.example.org/UMLFairness">
  <packagedElement xmi:id="c1" name="Applicant">
    <ownedAttribute xmi:id="a1" name="employed" type="tb"/>
    <ownedAttribute xmi:id="a2" name="income" type="ti"/>
    <ownedAttribute xmi:id="a3" name="age" type="ti" isDerived="true"/>
    <ownedAttribute xmi:id="a4" name="score" type="ti" isDerived="true">
      <defaultValue xmi:id="d1" name="5"/>
    </ownedAttribute>
    <ownedAttribute xmi:id="a5" name="gender" type="ts"/>
    <ownedAttribute xmi:id="a6" name="approved" type="tb"/>
    <region>
      <transition xmi:id="t1" guard="g1">
        <ownedRule xmi:id="g1" name="employed == true"/>
      </transition>
      <transition xmi:id="t2" guard="g2">
        <ownedRule xmi:id="g2" name="income &gt;= 1000 &amp;&amp; employed == true"/>
      </transition>
      <transition xmi:id="t3" guard="g3">
        <ownedRule xmi:id="g3" name="age &gt;= 18"/>
      </transition>
      <transition xmi:id="t4" guard="g4">
        <ownedRule xmi:id="g4" name="score &gt; 3"/>
      </transition>
    </region>
  </packagedElement>
  <packagedElement xmi:id="tb" name="boolean"/>
  <packagedElement xmi:id="ti" name="int"/>
  <packagedElement xmi:id="ts" name="String"/>
  <UMLFairness:critical base_StructuredClassifier="c1">
    <protectedData>(gender,race)</protectedData>
  </UMLFairness:critical>
  <sensitiveDecisions>(approved)</sensitiveDecisions>
</xmi:XMI>"#;

fn run_applicant() -> initsynth::PipelineOutput {
    let doc = ModelDocument::parse(APPLICANT_MODEL).expect("model parse failed");
    pipeline::run(&doc).expect("pipeline failed")
}

#[test]
fn test_columns_are_derived_then_direct_in_discovery_order() {
    let out = run_applicant();
    assert_eq!(
        out.table.columns,
        [
            INI_ID_COLUMN,
            "Applicant_age",
            "Applicant_score",
            "Applicant_employed",
            "Applicant_income",
        ]
    );
}

#[test]
fn test_row_count_is_product_of_final_domain_sizes() {
    let out = run_applicant();
    // age [17, 18], score ["5"], employed [true, false], income [999, 1000]
    assert_eq!(out.table.row_count(), 8);
    for row in &out.table.rows {
        assert_eq!(row.values.len(), out.table.column_count() - 1);
    }
    let ids: Vec<usize> = out.table.rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, (0..8).collect::<Vec<_>>());
}

#[test]
fn test_default_overrides_guard_threshold() {
    let out = run_applicant();
    let score_index = out
        .table
        .columns
        .iter()
        .position(|c| c == "Applicant_score")
        .expect("score column missing")
        - 1;
    for row in &out.table.rows {
        assert_eq!(row.values[score_index], DomainValue::Text("5".into()));
    }
}

#[test]
fn test_compound_guard_contributes_each_leaf_once() {
    let out = run_applicant();
    // `employed == true` appears in two guards; structural dedup plus
    // key dedup leave a single condition.
    let employed: Vec<_> = out
        .direct_conditions
        .iter()
        .filter(|c| c.parameter.as_ref() == "employed")
        .collect();
    assert_eq!(employed.len(), 1);

    let income = out
        .direct_conditions
        .iter()
        .find(|c| c.parameter.as_ref() == "income")
        .expect("income condition missing");
    assert_eq!(income.value.as_ref(), "1000");
}

#[test]
fn test_protected_characteristics_extraction() {
    let out = run_applicant();
    assert_eq!(
        out.protected_characteristics,
        ["Applicant_gender", "Applicant_race"]
    );
}

#[test]
fn test_decision_attributes_extraction() {
    let out = run_applicant();
    let decisions = out.decision_attributes.expect("decision extraction failed");
    assert_eq!(decisions.columns, ["Applicant_approved"]);
    assert_eq!(
        decisions.types,
        [("Applicant_approved".to_string(), "boolean".to_string())]
    );
}

#[test]
fn test_class_names_are_distinct_contributors() {
    let out = run_applicant();
    assert_eq!(out.class_names, ["Applicant"]);
}

#[test]
fn test_rerun_is_idempotent() {
    let first = run_applicant();
    let second = run_applicant();
    assert_eq!(first.table, second.table);
    assert_eq!(first.data_types, second.data_types);
    assert_eq!(
        first.protected_characteristics,
        second.protected_characteristics
    );
}

#[test]
fn test_unparseable_and_unresolvable_guards_degrade_locally() {
    let doc = ModelDocument::parse(
        br#"<model xmlns:xmi="http://www.omg.org/XMI"
         xmlns:UMLFairness="uri:fairness">
  <packagedElement xmi:id="c1" name="Order">
    <ownedAttribute xmi:id="a1" name="urgent" type="tb"/>
    <region>
      <transition xmi:id="t1" guard="g1">
        <ownedRule xmi:id="g1" name="urgent == true"/>
      </transition>
      <transition xmi:id="t2" guard="g2">
        <ownedRule xmi:id="g2" name="!!! broken"/>
      </transition>
      <transition xmi:id="t3" guard="dangling"/>
      <transition xmi:id="t4" guard="g4">
        <ownedRule xmi:id="g4" name="ghost == 1"/>
      </transition>
    </region>
  </packagedElement>
  <packagedElement xmi:id="tb" name="boolean"/>
</model>"#,
    )
    .expect("model parse failed");
    let out = pipeline::run(&doc).expect("pipeline failed");

    // Broken guard, dangling reference, and a predicate naming no
    // attribute of the class each degrade to omission.
    assert_eq!(out.table.columns, [INI_ID_COLUMN, "Order_urgent"]);
    assert_eq!(out.table.row_count(), 2);
}
