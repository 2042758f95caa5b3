use crate::error::SynthesisError;
use crate::extract::PageContent;

/// Build the extraction instruction for one page
pub fn build_extraction_prompt(content: &PageContent, url: &str) -> Result<String, SynthesisError> {
    let serialized = serde_json::to_string_pretty(content).map_err(SynthesisError::Serialize)?;

    Ok(format!(
        r#"I have extracted content from a job posting webpage at {url}.

Please extract ONLY the following information from the content:
1. job_title: The title of the job position
2. job_description: The FULL job description (include all paragraphs, not just a summary)
3. job_location: The location of the job
4. job_salary: The salary range or compensation information
5. job_id: Any job ID or reference number
6. basic_qualifications: The BASIC QUALIFICATIONS or MINIMUM REQUIREMENTS section
7. preferred_qualifications: The PREFERRED QUALIFICATIONS or NICE TO HAVE section

For any field where information is not available, use the literal string "NULL".

Here's the extracted content:
{serialized}

Return ONLY a valid JSON object with these 7 fields. Do not include any explanation or text outside the JSON structure."#
    ))
}
