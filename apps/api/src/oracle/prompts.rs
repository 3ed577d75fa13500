// Oracle prompt templates.
// Three roles, one per pipeline operation: job-description summary (once per
// batch), aspect extraction (per document), scoring (per document). Templates
// are filled by placeholder substitution, never by format! over user input.

/// System prompt shared by all three oracle roles.
pub const ORACLE_SYSTEM: &str = "You are a precise recruiting analyst. \
    Work strictly from the text you are given. \
    Do NOT invent, assume, or embellish details that are not present in the input.";

/// Summarizes a raw job description into the digest every scoring call shares.
pub const JOB_SUMMARY_PROMPT: &str = r#"The text below is a job description:

{job_description_text}

Extract the aspects needed to evaluate a candidate, organized as:

1. Candidate Profile
   - Job-related keywords: the skills, tools, and qualifications the role centers on.
   - Relevant past roles and responsibilities that align with this position.
   - Actionable expectations (e.g. "Design and implement X", "Lead Y").

2. Experience Requirements
   - Required and preferred years of experience.
   - Technical skills, split into core and supplementary.
   - Soft skills and interpersonal abilities named in the description.

3. Educational Qualifications and Certifications
   - Minimum educational requirements, mandatory vs. preferred.
   - Certifications or training programs required or preferred.

Answer in concise bullet points under these headings. Do not add assumptions or
details that are not in the job description."#;

/// Extracts the scorable aspects of one candidate document.
pub const ASPECT_PROMPT: &str = r#"The text below is a resume:

{resume_text}

Extract its content under these headings, staying strictly within what the
resume states:

1. Candidate Profile
   - Keywords reflecting the candidate's skills, roles, and expertise.
   - Summary of past roles, emphasizing responsibilities and measurable outcomes.
   - Quantified achievements and the action verbs used for them.

2. Experience Details
   - Total years of experience and the industries or domains covered.
   - Technical skills explicitly mentioned, core vs. supplementary.
   - Soft skills and team contributions, with the supporting examples given.

3. Educational Qualifications and Certifications
   - Highest qualification, field of study, notable honors.
   - Certifications and training programs, with their stated relevance.

Answer in concise bullet points under these headings."#;

/// Scores one candidate's extracted aspects against the shared job summary.
/// The response must be a single whole number 0-100; the pipeline parses the
/// first such number out of free text and records a parse failure otherwise.
pub const SCORE_PROMPT: &str = r#"Evaluate how well the candidate below matches the job requirements, then answer
with a single overall score.

CANDIDATE ASPECTS:
{resume_aspects}

JOB REQUIREMENTS:
{job_summary}

Scoring guidelines (total 100):
1. Candidate Profile (max 15): job-related keywords (5), relevance of past
   roles (5), clarity of responsibilities with action verbs and measurable
   outcomes (5).
2. Experience (max 65): years of experience vs. requirement (15), matching
   technical skills with supporting evidence (40), communication and teamwork
   with examples (10).
3. Education and Certifications (max 20): minimum qualifications met (15),
   relevant certifications or training (5).

Score evidence-backed claims over unsupported ones. Sum the three sections and
round to the nearest whole number.

Output: the final score as a single whole number between 0 and 100, with no
additional text. If the candidate cannot be scored, output 0."#;
