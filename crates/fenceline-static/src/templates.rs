//! Template engine for rendering blog posts.

use minijinja::{context, Environment};

/// A table of contents entry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Context for rendering a post template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Context {
    /// Post title
    pub title: String,
    /// Site title
    pub site_title: String,
    /// Publication date
    pub date: Option<String>,
    /// Post summary
    pub description: Option<String>,
    /// Estimated reading time in minutes
    pub time_to_read: usize,
    /// Rendered content HTML
    pub content: String,
    /// Table of contents
    pub toc: Vec<TocEntry>,
    /// Stylesheets to link
    pub styles: Vec<String>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the bundled templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        env.add_template_owned("post.html".to_string(), POST_TEMPLATE.to_string())
            .expect("Failed to add post template");

        Self { env }
    }

    /// Render a page using the specified template.
    pub fn render_page(
        &self,
        template: &str,
        context: &Context,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            title => &context.title,
            site_title => &context.site_title,
            date => &context.date,
            description => &context.description,
            time_to_read => context.time_to_read,
            content => &context.content,
            toc => &context.toc,
            styles => &context.styles,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site_title }}</title>
  {% for style in styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}
</head>
<body>
  <main class="main">
    {% block content %}{% endblock %}
  </main>
</body>
</html>"##;

const POST_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="post">
  <header>
    <h1 class="post-title">{{ title }}</h1>
    <p class="post-meta">{{ time_to_read }} min read{% if date %} | <time>{{ date }}</time>{% endif %}</p>
    {% if description %}<p class="post-description">{{ description }}</p>{% endif %}
  </header>

  {% if toc %}
  <nav class="toc">
    <ul>
    {% for entry in toc %}
      <li class="toc-level-{{ entry.level }}"><a href="#{{ entry.id }}">{{ entry.title }}</a></li>
    {% endfor %}
    </ul>
  </nav>
  {% endif %}

  <section class="post-body">
    {{ content | safe }}
  </section>
</article>
{% endblock %}"##;
