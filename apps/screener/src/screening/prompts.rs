// System instructions for the three screening stages.
// Outputs are free text; no schema is requested or enforced.

/// Stage 1: pull structured candidate details out of raw resume text.
pub const EXTRACTOR_PROMPT: &str = "You are a resume parser. \
    Extract structured candidate details like skills, experience, education, etc.";

/// Stage 2: score the extracted profile against the job description.
pub const MATCHER_PROMPT: &str = "You are a recruiter. \
    Match the resume to the job description and output score out of 100 & key matches.";

/// Stage 3: restate the match report for a non-technical reader.
pub const EXPLAINER_PROMPT: &str =
    "You are an HR assistant. Summarize the matching in plain language (3-5 sentences).";

