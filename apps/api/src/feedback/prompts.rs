// Feedback prompt. Inputs are bounded before they reach the provider.

use crate::analysis::text::truncate_chars;
use crate::feedback::FeedbackInput;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

pub const MAX_RESUME_CHARS: usize = 3000;
pub const MAX_PROMPT_SKILLS: usize = 30;
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 2000;
pub const MAX_PROMPT_MISSING_SKILLS: usize = 20;

pub fn feedback_system() -> String {
    format!(
        "You are an expert ATS resume evaluator and recruiter with 10+ years of experience. \
         {JSON_ONLY_SYSTEM}"
    )
}

pub fn feedback_prompt(input: &FeedbackInput<'_>) -> String {
    let resume = truncate_chars(input.resume_text, MAX_RESUME_CHARS);

    let skills = join_limited(input.skills.all.iter(), MAX_PROMPT_SKILLS);
    let skills = if skills.is_empty() {
        "None identified".to_string()
    } else {
        skills
    };

    let job = input
        .job_description
        .map(|jd| truncate_chars(jd.trim(), MAX_JOB_DESCRIPTION_CHARS))
        .filter(|jd| !jd.is_empty())
        .unwrap_or("General professional resume evaluation");

    let missing = input
        .match_result
        .map(|m| join_limited(m.missing_skills.iter(), MAX_PROMPT_MISSING_SKILLS))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "None identified".to_string());

    let b = input.breakdown;

    format!(
        r#"Analyze this resume text:
{resume}

Extracted Skills:
{skills}

Target Job Description:
{job}

Missing Skills:
{missing}

Heuristic ATS breakdown (0-100): keyword density {kd:.1}, formatting {fmt:.1}, action verbs {av:.1}, experience relevance {er:.1}, skill match {sm:.1}, total {total:.1}.

Return a JSON object with exactly this structure:
{{
  "ats_score": <number 0-100>,
  "missing_skills": [<critical missing skills>],
  "improvements": [<5 specific improvements to increase ATS ranking>],
  "rewritten_bullets": [<3 rewritten bullet points using strong action verbs and quantifiable metrics>],
  "recruiter_summary": "<2-3 sentence summary of the candidate's profile and fit for the role>"
}}

Focus on ATS optimization, quantifiable achievements, action verb usage, keyword optimization and skill gaps."#,
        kd = b.keyword_density,
        fmt = b.formatting,
        av = b.action_verbs,
        er = b.experience_relevance,
        sm = b.skill_match,
        total = b.total,
    )
}

fn join_limited<'a>(items: impl Iterator<Item = &'a String>, limit: usize) -> String {
    items
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
