// All prompt templates for the recruitment agents.
// Placeholders in `{braces}` are filled with `str::replace` before sending.

/// Skill confidence prompt. Replace: {skill}, {evidence_json}
pub const SKILL_CONFIDENCE_TEMPLATE: &str = "Rate proficiency confidence (0-1) for skill '{skill}' \
given evidence counts per source {evidence_json}. Only output a number.";

/// Job comparison prompt. Replace: {skills_json}, {work_history_json}, {projects_json}, {job_json}
pub const JOB_COMPARISON_TEMPLATE: &str = r#"Compare the candidate's skills and experience with the job description.

Candidate Skills:
{skills_json}

Candidate Work History:
{work_history_json}

Candidate Projects:
{projects_json}

Job Description:
{job_json}

Provide:
1. Overall match percentage
2. Key strengths
3. Gaps to be addressed
4. Role fit analysis in 2-3 sentences."#;

/// Career summary prompt. Replace: {work_history_json}, {projects_json}, {yoe}
pub const CAREER_SUMMARY_TEMPLATE: &str = r#"Summarize the candidate's career in 2-3 recruiter-style sentences.

Work History:
{work_history_json}

Projects:
{projects_json}

YOE: {yoe}"#;

/// Overall insights prompt.
/// Replace: {resume_json}, {linkedin_json}, {github_json}, {leetcode_json},
///          {work_history_json}, {yoe}, {job_json}, {fairness_instruction}
pub const INSIGHTS_TEMPLATE: &str = r#"Analyze the candidate's strengths, risks, and potential role fit.

{fairness_instruction}

Resume:
{resume_json}

LinkedIn:
{linkedin_json}

GitHub:
{github_json}

LeetCode:
{leetcode_json}

Work History:
{work_history_json}

YOE: {yoe}

Job Description:
{job_json}"#;

/// Assessment prompt. Replace: {candidate_json}, {job_json}, {json_only_instruction}
pub const ASSESSMENT_TEMPLATE: &str = r#"You are an assessment generator.
Create a JSON array of 3 coding challenges for the candidate below.

Candidate Profile:
{candidate_json}

Job Description:
{job_json}

Rules:
- Total 3 questions:
    1-2: Easy to Medium DSA, based on the candidate's strengths and LeetCode profile. Avoid trivial questions.
    3: Hard, tailored specifically to the Job Description; assess problem-solving.
- The JSON must be a list of objects, each with:
  "title", "difficulty", "description", "instructions", "constraints", "examples", "options"
- "examples" must be a list of objects with "input" and "output"
- "options" must include "time_limit_min" and "languages_allowed"

{json_only_instruction}"#;

/// Behavioral analysis prompt.
/// Replace: {person_id}, {candidate_text}, {fairness_instruction}, {json_only_instruction}
pub const BEHAVIORAL_TEMPLATE: &str = r#"You are an AI behavioral and cultural fit analyzer.

Candidate Text:
{candidate_text}

Task:
- Analyze the candidate's soft skills based on the text.
- Identify keywords and themes related to:
    - Collaboration
    - Problem-solving
    - Communication
- Provide a high-level summary of behavioral strengths.
- Include a bias mitigation protocol.

{fairness_instruction}

Structure the JSON as:
{
  "person_id": "{person_id}",
  "soft_skill_analysis": {"collaboration": "...", "problem_solving": "...", "communication": "..."},
  "keywords": ["...", "..."],
  "themes": ["...", "..."],
  "high_level_insights": "...",
  "bias_mitigation_protocol": {"guidelines": ["...", "..."]}
}

{json_only_instruction}"#;

/// Market summary prompt.
/// Replace: {job_id}, {role}, {location}, {seniority}, {p25}, {median}, {p75},
///          {total_openings}, {avg_tsi}, {hotspots_json}, {channels_json},
///          {fairness_instruction}, {json_only_instruction}
pub const MARKET_SUMMARY_TEMPLATE: &str = r#"You are a Market Intelligence & Talent Sourcing expert.

Job role: {role}
Location: {location}
Seniority: {seniority}

Market Data:
- Compensation Benchmarks (LPA): p25 {p25}, median {median}, p75 {p75}
- Total openings: {total_openings}
- Avg Talent Supply Index: {avg_tsi}
- Hotspot locations: {hotspots_json}
- Recommended sourcing channels: {channels_json}

Task:
- Provide a high-level market summary with recommendations.
- Highlight pay competitiveness, talent availability, and top sourcing channels.

{fairness_instruction}

JSON schema:
{
  "job_id": "{job_id}",
  "summary": "...",
  "recommendations": ["...", "..."]
}

{json_only_instruction}"#;
