/// Static placeholder guide for template authors.

/// Human-readable description of the placeholder set.
///
/// This is documentation text for people building templates, served
/// verbatim by whatever layer exposes it. It is intentionally a literal,
/// not generated from the catalogue.
pub const PLACEHOLDER_GUIDE: &str = r#"
# PowerPoint Template Placeholder Guide

Use the following placeholders in your PowerPoint template.
The system will automatically replace them with case study data.

## Available Placeholders:

- {{PROJECT_NAME}} - Name of the project
- {{CLIENT}} - Client name
- {{INDUSTRY}} - Industry sector
- {{YEAR}} - Project year
- {{CHALLENGE}} - Project challenge/problem
- {{SOLUTION}} - Solution provided
- {{OUTCOMES}} - Project outcomes/results
- {{TECHNOLOGIES}} - Technologies used
- {{TEAM_SIZE}} - Team size (e.g., "5 people")
- {{DURATION}} - Project duration (e.g., "6 months")
- {{PROJECT_VALUE}} - Project value/budget
- {{TAGS}} - Project tags
- {{CREATED_BY}} - Created by user
- {{EXPORT_DATE}} - Current date (auto-generated)

## Usage Example:

In your PowerPoint template, add text like:

"Project: {{PROJECT_NAME}}"
"Client: {{CLIENT}}"
"Challenge: {{CHALLENGE}}"

When you export a case study, these will be replaced with actual data.

Keep each placeholder inside a single text run: a token split across two
differently formatted runs is not recognized in shape text (table cells
recombine their runs, so splits inside a cell are fine).
"#;
