//! 各阶段的提示模板

/// 分节调研子流程的「主题」：总主题 + 分节标题 + 分节描述
pub fn section_topic(topic: &str, section_name: &str, section_description: &str) -> String {
    format!(
        "Overall topic: {}\nSection title: {}\nSection description: {}",
        topic, section_name, section_description
    )
}

pub fn query_writer(topic: &str, today: &str, number_of_queries: usize, schema: &str) -> String {
    format!(
        r#"Your goal is to generate targeted web search queries that will gather comprehensive information for writing a summary about a topic.
You will generate exactly {n} queries.

<topic>
{topic}
</topic>

Today's date is:
<today>
{today}
</today>

When generating the search queries:
1. Make sure to cover different aspects of the topic.
2. Make sure that your queries account for the most current information available as of today.

Your queries should be:
- Specific enough to avoid generic or irrelevant results.
- Targeted to gather specific information about the topic.
- Diverse enough to cover all aspects of the summary plan.

Return a JSON object matching this schema:
{schema}

It is very important that you generate exactly {n} queries."#,
        n = number_of_queries,
        topic = topic,
        today = today,
        schema = schema,
    )
}

pub fn planner(topic: &str, report_organization: &str, context: &str, schema: &str) -> String {
    format!(
        r#"You are an expert writer planning the outline of sections of a report about a given topic.

<goal>
Generate a list of sections for the report.
</goal>

The topic of the report is:
<topic>
{topic}
</topic>

The report should follow this organization:
<report organization>
{report_organization}
</report organization>

The context to use in planning the sections of the report:
<context>
{context}
</context>

<task>
Generate a list of sections for the report. Your plan should be tight and focused with NO overlapping sections or unnecessary filler.

For example, a good report structure might look like:
1/ introduction
2/ overview of topic A
3/ overview of topic B
4/ comparison between A and B
5/ conclusion
</task>

<requirements>
Each section should have the following fields:

- name: Name for this section of the report.
- description: Brief overview of the main topics and concepts to be covered in this section.
- research: Whether to perform web research for this section of the report (true or false).
- content: The content of the section, which you will leave blank for now.

Guidelines:
- Ensure each section has a distinct purpose with no content overlap.
- Include examples and related details within main topic sections, not as separate sections.
- Combine related concepts rather than separating them.
- Every section MUST be directly relevant to the main topic.
- Introduction and conclusion will not require research because they will distill information from other parts of the report.
- Main body sections MUST have research set to true.
</requirements>

<format>
Return the sections of the report as a JSON object matching this schema:
{schema}
</format>

Before submitting, review your structure to ensure it has no redundant sections and follows a logical flow."#,
        topic = topic,
        report_organization = report_organization,
        context = context,
        schema = schema,
    )
}

pub fn source_summary(topic: &str, title: &str, content: &str) -> String {
    format!(
        r#"You are summarizing a web source for a researcher writing about the topic below.

<topic>
{topic}
</topic>

<source title>
{title}
</source title>

<source content>
{content}
</source content>

<requirements>
- Keep only the facts, figures, examples and arguments relevant to the topic.
- Write 1 to 3 dense paragraphs of plain prose.
- Do not invent information that is not in the source.
</requirements>

Start directly with the summary, without preamble."#,
        topic = topic,
        title = title,
        content = content,
    )
}

pub fn section_writer(topic: &str, context: &str) -> String {
    format!(
        r#"You are an expert technical writer crafting one section of a research report.

<section>
{topic}
</section>

<sources>
{context}
</sources>

<requirements>
- Write 150-400 words grounded in the provided sources.
- Start with the single most important insight in bold.
- Use short paragraphs; at most one focused list or table if it clarifies a comparison.
- Reference concrete examples, figures and case studies from the sources.
- No section title, no sources list, no preamble. Do not use XML tags in the output.
</requirements>"#,
        topic = topic,
        context = context,
    )
}

pub fn final_section(topic: &str, section_name: &str, section_description: &str, context: &str) -> String {
    format!(
        r#"You are an expert writer working on writing a section that synthesizes information from the rest of the report about a given topic.

<Goal>
Write a high quality section to complement and synthesize the information from other report sections.
</Goal>

The topic you are writing about:
<topic>
{topic}
</topic>

The name/title of the section you are going to write:
<section name>
{section_name}
</section name>

The description of the section you are going to write:
<section description>
{section_description}
</section description>

The already written content of the report:
<context>
{context}
</context>

<Requirements>
1. For Introduction:
- Write in a clear language.
- Focus on the core motivation for the report.
- Provide a detailed overview of the key points covered in the main body sections (mention key examples, case studies, or findings).
- Use a clear and logical story flow to introduce the report.
- Do not include any structural elements (no lists or tables).
- No sources section needed.

2. For Conclusion/Summary:
- Synthesize and tie together the key themes, findings, and insights from the main body sections.
- Reference specific examples, case studies, or data points covered in the report.
- Use structural elements only if they help distill the information given in the report.
- Tables and lists must obey Markdown syntax.
- End with specific next steps or implications based on the report content.
- No sources section needed.
</Requirements>

<Formatting>
- Start directly with the section writing, without preamble or titles. Do not use XML tags in the output.
</Formatting>"#,
        topic = topic,
        section_name = section_name,
        section_description = section_description,
        context = context,
    )
}

pub fn report_title(topic: &str, context: &str) -> String {
    format!(
        r#"You are an expert writer working on writing a title for the report about a given topic.

<Goal>
Write a high quality report title for the given report context.
</Goal>

The topic of the report:
<topic>
{topic}
</topic>

The already written content of the report:
<context>
{context}
</context>

<Formatting>
- Write only the report title, nothing else.
- The title should be a single sentence or phrase.
- Do not include quotation marks, colons, or formatting tags.
- Do not repeat or restate the topic verbatim.
- Make the title concise, engaging, and professional.
</Formatting>"#,
        topic = topic,
        context = context,
    )
}
