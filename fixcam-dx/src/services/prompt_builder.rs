//! Prompt construction for repair analysis and step illustration
//!
//! The textual scaffold is identical whether the attached media is an
//! image or a video; only the inline payload differs at the adapter.

/// Domain context sent as the system instruction
pub const SYSTEM_CONTEXT: &str = "\
You are an expert DIY home repair consultant with deep knowledge of:
- Hardware identification (faucets, fixtures, appliances, brands)
- Building materials (drywall, plaster, wood types, metals)
- Damage assessment (cracks, leaks, wear, malfunction)
- Repair difficulty and safety considerations

Analyze images and provide detailed, actionable repair guidance.";

/// Bound on the step description carried into the image prompt
const STEP_DESCRIPTION_PREFIX_CHARS: usize = 300;

/// Render the analysis prompt for one diagnosis request.
///
/// The JSON schema below is a best-effort instruction: the model usually
/// honors the no-fencing request but not always, which is why extraction
/// strips fences rather than trusting this.
pub fn build_analysis_prompt(description: Option<&str>) -> String {
    let user_context = match description {
        Some(d) if !d.trim().is_empty() => format!("User description: {}\n\n", d.trim()),
        _ => String::new(),
    };

    format!(
        r#"Analyze this media for a DIY home repair assessment.

{user_context}Provide a comprehensive analysis in the following JSON format:
{{
  "title": "Brief descriptive title of the repair (e.g., 'Fix Leaky Moen Kitchen Faucet')",
  "hardware_identified": "Specific hardware/material identified (brand, model if visible)",
  "issue_type": "Type of damage or issue identified",
  "description": "Detailed description of the problem and what needs to be fixed",
  "skill_level": 1-4 (1=Novice: no power tools, <30min | 2=Beginner: basic tools, 1-2hrs | 3=Intermediate: power tools, potential risks | 4=Expert: permits/specialized knowledge),
  "estimated_time": "Time estimate (e.g., '30 minutes', '2-3 hours')",
  "safety_warnings": ["List of important safety warnings"],
  "steps": [
    {{
      "step_number": 1,
      "title": "Step title",
      "description": "Detailed step description with micro-steps. Include conditional logic like 'If X, then do Y, otherwise do Z'",
      "warning": "Optional safety warning for this specific step",
      "image_hint": "Brief description of what to look for or how to position"
    }}
  ],
  "materials": [
    {{
      "name": "Material name",
      "estimated_cost": "$X-Y or 'included' or 'varies'"
    }}
  ],
  "tools": [
    {{
      "name": "Tool name",
      "estimated_cost": "$X-Y or 'common household item'"
    }}
  ]
}}

IMPORTANT:
- Be specific about hardware (brands, models, types)
- Include conditional logic in steps (if/then scenarios)
- Rate difficulty honestly based on the criteria
- Include at least 5-10 detailed steps
- List all materials and tools needed
- Provide safety warnings for any risky steps
- Return ONLY the JSON object with no surrounding commentary and no code fences"#,
    )
}

/// Render the generation prompt for one step's illustrative image.
pub fn build_step_image_prompt(
    project_title: &str,
    step_title: &str,
    step_description: &str,
    image_hint: Option<&str>,
) -> String {
    let description = truncate_chars(step_description, STEP_DESCRIPTION_PREFIX_CHARS);

    let mut prompt = format!(
        "Clear instructional illustration for a DIY home repair guide.\n\
         Repair project: {}\n\
         Step: {}\n\
         What happens in this step: {}",
        project_title, step_title, description
    );

    if let Some(hint) = image_hint {
        if !hint.trim().is_empty() {
            prompt.push_str(&format!("\nFocus on: {}", hint.trim()));
        }
    }

    prompt.push_str(
        "\nStyle: clean, well-lit photographic illustration, tools and hands visible, \
         no text overlays.",
    );

    prompt
}

/// Truncate on a char boundary to at most `max_chars` characters
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
