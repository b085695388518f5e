//! Submission documents shared across integration tests.
#![allow(dead_code)]

/// A complete YAML submission for `username`.
pub fn valid_yaml(username: &str) -> String {
    format!(
        r#"username: {username}
paper_title: Sparse Attention at Scale
paper_pdf: https://arxiv.org/pdf/2401.00001
identifier: "2401.00001"
claim_type: custom_code
code_url: https://github.com/{username}/sparse-attn
claims:
  - claim: Top-1 accuracy reaches 91.2% on ImageNet
    context: Table 3, ViT-B backbone
    instruction:
      - git clone https://github.com/{username}/sparse-attn
      - python train.py --config vit_b.yaml
non_reproducible_claims:
  - claim: Training takes under 4 hours
    reason: Needs 64 A100s
"#
    )
}

/// A complete JSON submission for `username`.
pub fn valid_json(username: &str) -> String {
    format!(
        r#"{{
  "username": "{username}",
  "paper_title": "Learning Rates Revisited",
  "paper_pdf": "https://example.org/lr.pdf",
  "identifier": "10.1000/lr.2024",
  "claim_type": "pip_libraries",
  "claims": [
    {{
      "claim": "Warmup halves divergence",
      "instruction": ["pip install torch", "python run.py"]
    }}
  ]
}}
"#
    )
}

/// A JSON submission carrying only a username and a claim type that needs no code URL.
pub fn username_only(username: &str) -> String {
    format!(r#"{{"username": "{username}", "claim_type": "pip_libraries"}}"#)
}

/// A JSON submission with a username but no claim type, so the legacy code URL rule applies.
pub fn legacy_username_only(username: &str) -> String {
    format!(r#"{{"username": "{username}"}}"#)
}
