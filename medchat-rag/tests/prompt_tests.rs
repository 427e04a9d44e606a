use std::collections::HashMap;

use medchat_rag::{PatientScope, PromptBuilder, RetrievalMatch, assemble_context, snippet};

fn matched(id: &str, content: &str, score: f32) -> RetrievalMatch {
    RetrievalMatch {
        record_id: id.to_string(),
        content: content.to_string(),
        score,
        metadata: HashMap::new(),
    }
}

#[test]
fn no_matches_assembles_no_context() {
    assert!(assemble_context(&[], 200).is_none());
}

#[test]
fn context_preserves_ranking_order() {
    let matches = vec![
        matched("a", "first record", 0.9),
        matched("b", "second record", 0.7),
        matched("c", "third record", 0.5),
    ];

    let block = assemble_context(&matches, 200).unwrap();
    let first = block.find("first record").unwrap();
    let second = block.find("second record").unwrap();
    let third = block.find("third record").unwrap();
    assert!(first < second && second < third);
    assert!(block.contains("Record 1:"));
    assert!(block.contains("Record 3:"));
    assert!(block.contains("Relevance Score: 0.900"));
}

#[test]
fn context_truncates_content_for_display_only() {
    let long_content = "x".repeat(500);
    let matches = vec![matched("a", &long_content, 0.9)];

    let block = assemble_context(&matches, 200).unwrap();
    assert!(block.contains(&format!("{}...", "x".repeat(200))));
    assert!(!block.contains(&long_content));
    // The match itself is untouched.
    assert_eq!(matches[0].content.len(), 500);
}

#[test]
fn context_names_the_source_when_present() {
    let mut with_source = matched("a", "note text", 0.8);
    with_source
        .metadata
        .insert("source_filename".to_string(), "discharge.pdf".to_string());

    let block = assemble_context(&[with_source], 200).unwrap();
    assert!(block.contains("Source: discharge.pdf"));
}

#[test]
fn snippet_respects_char_boundaries() {
    let content = "é".repeat(150); // 300 bytes
    let cut = snippet(&content, 101);
    // 101 falls mid-char; the cut backs up to 100 bytes, 50 chars.
    assert_eq!(cut, format!("{}...", "é".repeat(50)));
}

#[test]
fn snippet_leaves_short_content_unmarked() {
    assert_eq!(snippet("short note", 200), "short note");
}

#[test]
fn patient_scoped_prompt_carries_privacy_guidelines() {
    let builder = PromptBuilder::default();
    let scope = PatientScope::new("p-1").with_name("Jordan Reyes");

    let prompt = builder.system_prompt(&[matched("a", "record", 0.9)], Some(&scope));

    assert!(prompt.contains("CRITICAL PRIVACY REQUIREMENTS"));
    assert!(prompt.contains("Jordan Reyes"));
    assert!(prompt.contains("Use ONLY the above patient-specific records"));
    assert!(!prompt.contains("GENERAL INFORMATION MODE"));
}

#[test]
fn general_prompt_allows_broad_information() {
    let builder = PromptBuilder::default();

    let prompt = builder.system_prompt(&[matched("a", "record", 0.9)], None);

    assert!(prompt.contains("GENERAL INFORMATION MODE"));
    assert!(prompt.contains("general medical knowledge"));
    assert!(!prompt.contains("CRITICAL PRIVACY REQUIREMENTS"));
}

#[test]
fn patient_prompt_without_records_says_so() {
    let builder = PromptBuilder::default();
    let scope = PatientScope::new("p-1");

    let prompt = builder.system_prompt(&[], Some(&scope));

    assert!(prompt.contains("No patient-specific records found"));
    assert!(!prompt.contains("Relevant Records:"));
}

#[test]
fn general_prompt_without_records_has_no_context_block() {
    let builder = PromptBuilder::default();
    let prompt = builder.system_prompt(&[], None);
    assert!(!prompt.contains("Relevant Records:"));
    assert!(!prompt.contains("No patient-specific records found"));
}
