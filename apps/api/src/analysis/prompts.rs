// All LLM prompt constants for the Analysis module.

/// System prompt for CV parsing — accuracy over invention, JSON-only output.
pub const CV_PARSE_SYSTEM: &str = "You are an expert CV analyzer focused on ACCURACY. \
    Extract ALL information from a CV exactly as presented, maintaining complete fidelity \
    to the original content. \
    NEVER invent, make up, or fabricate ANY information that is not explicitly present in the CV. \
    Extract EVERY bullet point in work experience EXACTLY as written; never summarize them. \
    ONLY include sections that exist in the original CV; if a field is not found, OMIT it. \
    Format names properly without adding spaces where they don't exist. \
    Certifications belong in the customSections array. \
    ALWAYS look for a summary or objective statement near the top of the CV and extract it \
    as the bio field. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// CV parsing prompt template. Replace `{cv_text}` and `{design_style}`
/// before sending.
pub const CV_PARSE_PROMPT_TEMPLATE: &str = r#"STRICTLY PARSE THIS CV INTO STRUCTURED JSON WITH ONLY THE INFORMATION PRESENT IN THE CV:

CV CONTENT START:
{cv_text}
CV CONTENT END

REQUIRED JSON FORMAT:
{
  "name": "Full Name without adding extra spaces",
  "title": "Professional Title",
  "bio": "Professional summary/objective/profile statement if present in CV",
  "headline": "Only use a headline if explicitly present in CV",
  "contact": {
    "email": "email@example.com if present",
    "phone": "Phone number if present",
    "location": "City, Country if present"
  },
  "experience": [
    {
      "title": "Job Title exactly as in CV",
      "company": "Company Name exactly as in CV",
      "period": "Start-End dates exactly as in CV",
      "description": "Brief overview of role if present",
      "details": ["Bullet point 1 exactly as written", "Bullet point 2 exactly as written"]
    }
  ],
  "education": [
    {
      "degree": "Degree Name exactly as in CV",
      "institution": "Institution exactly as in CV",
      "year": "Graduation Year exactly as in CV",
      "description": "Education details exactly as in CV if present"
    }
  ],
  "skills": ["Only skills explicitly listed in CV or clearly implied from experience/certifications"],
  "projects": [
    {
      "name": "Project Name if projects section exists",
      "description": "Project description exactly as in CV",
      "technologies": ["Only technologies mentioned in project"],
      "url": "Project URL if available in CV"
    }
  ],
  "languages": ["Only languages explicitly mentioned in CV"],
  "socialLinks": [
    {
      "platform": "Only social links mentioned in CV",
      "url": "URLs as provided in CV"
    }
  ],
  "customSections": [
    {
      "title": "ONLY include custom sections explicitly present in CV (e.g., Publications, Certifications)",
      "items": [
        {
          "name": "Item name exactly as written",
          "description": "Description exactly as written",
          "date": "Date exactly as written if present",
          "url": "URL if present in CV"
        }
      ]
    }
  ],
  "designStyle": "{design_style}",
  "colorScheme": ["primary color", "secondary color", "accent color"],
  "fontPairings": {
    "heading": "Heading Font",
    "body": "Body Font"
  }
}"#;

/// System prompt for conversational profile editing.
pub const EDIT_SYSTEM: &str = "You are an AI assistant that helps users edit their CV/resume. \
    You will be given the current CV data as a JSON object and a request from the user. \
    Modify the CV data according to the user's request and return the updated CV data as a \
    JSON object. \
    ONLY make changes that the user explicitly requests. \
    Return the ENTIRE updated profile object and preserve all existing fields even if not \
    modified. \
    Make sure arrays remain arrays and objects remain objects. \
    If asked to add a new section that doesn't exist, create it with appropriate structure; \
    if asked to delete a section, remove it completely. \
    Do not add fabricated information unless specifically requested. \
    Return VALID JSON only.";

/// Edit prompt template. Replace `{current_profile}` and `{prompt}` before
/// sending.
pub const EDIT_PROMPT_TEMPLATE: &str = r#"Here is my current CV data:
{current_profile}

My request: {prompt}

Please return the updated CV data as a complete JSON object."#;
