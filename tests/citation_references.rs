/// Integration tests for resolving answer references against citation data.
use dietnerd::citation::{
    NO_REFERENCES, build_reference_list, extract_references, find_citation, parse_citation,
    reference_detail, render_references_html,
};
use dietnerd::{CitationMetadata, EvidenceQuality, MetadataStore, ReferenceMarker};

fn metadata(entries: &[(&str, &str)]) -> MetadataStore {
    entries
        .iter()
        .map(|(citation, pmcid)| {
            (
                citation.to_string(),
                CitationMetadata {
                    summary: format!("Summary for {citation}"),
                    pmid: "123".to_string(),
                    pmcid: pmcid.to_string(),
                    url: "https://pubmed.ncbi.nlm.nih.gov/123/".to_string(),
                },
            )
        })
        .collect()
}

#[test]
fn end_to_end_two_references_in_order() {
    let answer = "Eat more fiber [1] and protein [2].\n\nReferences:\n[1]\n2.";
    let citations = [
        "[1] Doe J. Fiber and satiety. J Nutr. 2020;150:1-10.",
        "2. Roe K. Protein needs. BMJ. 2019.",
    ];
    let store = metadata(&[(citations[0], "PMC111"), (citations[1], "None")]);

    let list = build_reference_list(answer, &citations, &store).expect("references resolve");
    assert_eq!(list.len(), 2);
    let entries = list.entries();
    assert_eq!(entries[0].marker.number(), 1);
    assert_eq!(entries[1].marker.number(), 2);
    assert_eq!(entries[0].parts.title, "Fiber and satiety");
    assert_eq!(entries[1].parts.authors, "Roe K");

    let html = list.to_html();
    assert!(html.starts_with("<b>References:</b><br><br> "));
    let anchors: Vec<&str> = html.match_indices("<a href=").map(|(_, m)| m).collect();
    assert_eq!(anchors.len(), 2);
    assert!(html.find("ref=[1]").unwrap() < html.find("ref=2.").unwrap());
    assert!(html.contains("Full Text Analysis"));
    assert!(html.contains("Abstract Only Analysis"));
    assert_eq!(html.matches("</a> - <span").count(), 2);
}

#[test]
fn evidence_follows_pmcid() {
    let citation = "[1]Doe J. Title A. Journal X.";
    let citations = [citation];
    let answer = "Claim [1].\nReferences:\n[1]";

    let abstract_only = build_reference_list(answer, &citations, &metadata(&[(citation, "None")]))
        .unwrap();
    assert_eq!(abstract_only.entries()[0].evidence, EvidenceQuality::AbstractOnly);

    let full_text = build_reference_list(answer, &citations, &metadata(&[(citation, "PMC42")]))
        .unwrap();
    assert_eq!(full_text.entries()[0].evidence, EvidenceQuality::FullText);
}

#[test]
fn unresolvable_markers_are_dropped() {
    let citations = ["[1] A B. T. J.", "[3] C D. T3. J3."];
    // [3] has a citation but no metadata; [2] has neither.
    let store = metadata(&[(citations[0], "None")]);
    let answer = "x\nReferences:\n[1]\n[2]\n[3]";

    let list = build_reference_list(answer, &citations, &store).unwrap();
    let numbers: Vec<u32> = list.entries().iter().map(|e| e.marker.number()).collect();
    assert_eq!(numbers, vec![1]);
}

#[test]
fn nothing_resolvable_yields_none_and_sentinel() {
    let citations: [&str; 0] = [];
    let store = MetadataStore::new();
    assert!(build_reference_list("No section", &citations, &store).is_none());
    assert!(build_reference_list("x References: [9]", &citations, &store).is_none());
    assert_eq!(
        render_references_html("x References: [9]", &citations, &store),
        NO_REFERENCES
    );
}

#[test]
fn mixed_forms_deduplicate_preserving_first_seen_order() {
    let markers = extract_references("Body.\nReferences:\n3.\n[1]\n[3]\n1.\n2.");
    let numbers: Vec<u32> = markers.iter().map(ReferenceMarker::number).collect();
    assert_eq!(numbers, vec![3, 1, 2]);
    assert_eq!(markers[0].to_string(), "[3]");
    assert_eq!(markers[2].to_string(), "2.");
}

#[test]
fn find_citation_accepts_either_header() {
    let citations = ["[10] Long A. T. J.", "1. Short B. T. J."];
    assert_eq!(
        find_citation(&ReferenceMarker::bracketed(1), &citations),
        Some("1. Short B. T. J.")
    );
    assert_eq!(
        find_citation(&ReferenceMarker::dotted(10), &citations),
        Some("[10] Long A. T. J.")
    );
    assert_eq!(find_citation(&ReferenceMarker::bracketed(2), &citations), None);
}

#[test]
fn malformed_citation_still_renders() {
    let citation = "[1] Only authors here";
    let citations = [citation];
    let store = metadata(&[(citation, "None")]);

    assert!(parse_citation(citation).is_err());
    let list = build_reference_list("a\nReferences:\n[1]", &citations, &store).unwrap();
    assert_eq!(list.entries()[0].parts.authors, "Only authors here");
}

#[test]
fn parse_citation_round_trips_well_formed_input() {
    for (citation, header_len) in [
        ("[1]Doe J. Title A. Journal X.", 3),
        ("[12] Smith A, Jones B. Oats and LDL. Am J Clin Nutr. 2018;107(3).", 5),
        ("4. Lee C. Salt. Hypertension.", 3),
    ] {
        let parts = parse_citation(citation).unwrap();
        assert_eq!(parts.body(), citation[header_len..], "{citation}");
    }
}

#[test]
fn detail_view_resolves_by_marker() {
    let citation = "[2] Roe K. Protein needs. BMJ.";
    let store = metadata(&[("[1] Doe J. Fiber. J Nutr.", "PMC1"), (citation, "None")]);

    let detail = reference_detail(&ReferenceMarker::parse("2.").unwrap(), &store).unwrap();
    assert_eq!(detail.citation, citation);
    assert_eq!(detail.evidence, EvidenceQuality::AbstractOnly);
    assert!(detail.to_html().contains("Summary for [2] Roe K."));
}
