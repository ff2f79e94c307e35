// The SEO analysis prompt.
//
// The page summaries go in verbatim, followed by two fixed tasks: name each
// cluster, then a SWOT analysis from an SEO perspective.

/// Inputs to the prompt, all pre-rendered as text.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    /// `name: content` lines for description meta tags
    pub meta_tags: &'a str,
    /// `hN: a, b` lines
    pub heading_tags: &'a str,
    /// `keyword: count` lines
    pub top_keywords: &'a str,
    /// Column-per-cluster text table
    pub cluster_table: &'a str,
}

pub fn build_seo_prompt(inputs: &PromptInputs<'_>) -> String {
    format!(
        "The following information is given about a company's website:

Meta Tags:
{meta}

Heading Tags:
{headings}

Top 10 Keywords:
{keywords}

The following table represents clusters of thematically related words identified using NLP and clustering techniques. Each column represents a different cluster, and the words in each column are thematically related.

{table}

Please analyze the provided information and perform the following tasks:
1. Assign a name to each cluster based on the theme it represents.
2. Perform a SWOT analysis (Strengths, Weaknesses, Opportunities, and Threats) from an SEO perspective for the company website as a whole, taking into account the meta tags, heading tags, top 10 keywords, and the clusters.

Please provide your analysis in a clear and concise manner.
",
        meta = inputs.meta_tags.trim_end(),
        headings = inputs.heading_tags.trim_end(),
        keywords = inputs.top_keywords.trim_end(),
        table = inputs.cluster_table.trim_end(),
    )
}
