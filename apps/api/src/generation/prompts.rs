// Prompt constants for the generation module. Placeholders in `{braces}` are
// substituted before sending.

/// Role for the rewrite call. Combined with `JSON_ONLY_SYSTEM`.
pub const REWRITE_ROLE: &str = "You are a professional resume writer.";

/// Replace `{description}`.
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"Rewrite the following job experience description to be more professional and impactful. Focus on highlighting achievements and quantifiable results.

Original Description: {description}

Return a JSON object with this EXACT schema:
{"rewrittenDescription": "..."}"#;

pub const MATCH_SCORE_ROLE: &str = "You are an expert career advisor. Your role is to compare a \
    candidate's profile with a job description and provide a skill match score and \
    recommendations for improvement.";

/// Replace `{profile_data}` and `{job_description}`.
pub const MATCH_SCORE_PROMPT_TEMPLATE: &str = r#"Candidate Profile:
{profile_data}

Job Description:
{job_description}

Instructions:
1. Analyze the candidate profile and the job description.
2. Calculate a match score (0-100) representing how well the candidate's skills and experience align with the job requirements.
3. Provide specific, actionable recommendations for the candidate to improve their profile and increase their chances of getting the job.
4. The match score is relative to the job description provided. Treat the job description as a high-priority goal.

Return a JSON object with this EXACT schema:
{"matchScore": 0, "recommendations": ["..."]}"#;

pub const ASSISTANT_ROLE: &str =
    "You are a career coach AI assistant that helps users build their resume.";

/// Replace `{context}` and `{query}`.
pub const ASSISTANT_PROMPT_TEMPLATE: &str = r#"The current conversation context is: {context}

Generate a response to the user query, taking into account the conversation context.

User Query: {query}

If the user is starting a new resume, start by asking them about their desired job title and industry.
Then ask them for more information about their work history, education, skills, and achievements. Suggest improvements to resume sections.
If the user asks you to do something that does not relate to resume creation, politely decline.
At the end of your response, summarize the next steps the user should take to make progress on their resume.

Return a JSON object with this EXACT schema:
{"response": "..."}"#;
