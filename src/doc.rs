//! Documentation comment model and structured-tag extraction.
//!
//! Block comments (`/** ... */`) preceding a declaration and trailing
//! same-line comments (`///< ...`) both end up as [`DocComment`] values.
//! Inside block text the tags `@param <name> <description>` and
//! `@return <description>` are parsed out; any other `@tag` stays in the
//! body verbatim.

/// Parsed documentation attached to a declaration, field or enumerator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocComment {
    /// First paragraph of the comment.
    pub brief: String,
    /// Remaining free text, unrecognized tags included.
    pub body: String,
    /// `@param` name/description pairs, in source order.
    pub params: Vec<DocParam>,
    /// `@return` description.
    pub ret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocParam {
    pub name: String,
    pub text: String,
}

/// Where continuation lines of the comment currently belong.
enum Target {
    Paragraph,
    Param,
    Return,
}

impl DocComment {
    /// Builds a doc from the inner text of a `/** ... */` block.
    pub fn from_block(raw: &str) -> Self {
        let mut doc = DocComment::default();
        let mut body_paras: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut seen_brief = false;
        let mut target = Target::Paragraph;

        fn flush(
            current: &mut String,
            brief: &mut String,
            body_paras: &mut Vec<String>,
            seen_brief: &mut bool,
        ) {
            let text = current.trim().to_string();
            current.clear();
            if text.is_empty() {
                return;
            }
            if *seen_brief {
                body_paras.push(text);
            } else {
                *brief = text;
                *seen_brief = true;
            }
        }

        for line in raw.lines() {
            let line = strip_comment_decoration(line);
            let trimmed = line.trim();

            if trimmed.is_empty() {
                flush(&mut current, &mut doc.brief, &mut body_paras, &mut seen_brief);
                target = Target::Paragraph;
                continue;
            }

            // structural tags are regenerated by the emitters, keeping
            // them here would double them up in the output
            if is_structural_tag(trimmed) {
                flush(&mut current, &mut doc.brief, &mut body_paras, &mut seen_brief);
                target = Target::Paragraph;
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix("@param") {
                flush(&mut current, &mut doc.brief, &mut body_paras, &mut seen_brief);
                let rest = rest.trim_start();
                let (name, text) = match rest.split_once(char::is_whitespace) {
                    Some((name, text)) => (name.to_string(), text.trim().to_string()),
                    None => (rest.to_string(), String::new()),
                };
                doc.params.push(DocParam { name, text });
                target = Target::Param;
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix("@return") {
                flush(&mut current, &mut doc.brief, &mut body_paras, &mut seen_brief);
                doc.ret = Some(rest.trim().to_string());
                target = Target::Return;
                continue;
            }

            match target {
                Target::Paragraph => {
                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(trimmed);
                }
                Target::Param => {
                    if let Some(param) = doc.params.last_mut() {
                        if !param.text.is_empty() {
                            param.text.push(' ');
                        }
                        param.text.push_str(trimmed);
                    }
                }
                Target::Return => {
                    if let Some(ret) = &mut doc.ret {
                        if !ret.is_empty() {
                            ret.push(' ');
                        }
                        ret.push_str(trimmed);
                    }
                }
            }
        }
        flush(&mut current, &mut doc.brief, &mut body_paras, &mut seen_brief);

        doc.body = body_paras.join("\n\n");
        doc
    }

    /// Builds a doc from a trailing `///< text` comment.
    pub fn from_trailing(raw: &str) -> Self {
        DocComment {
            brief: raw.trim().to_string(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.brief.is_empty() && self.body.is_empty() && self.params.is_empty() && self.ret.is_none()
    }
}

/// `@struct`, `@union`, `@enum` and `@file` lines, with or without an
/// argument.
fn is_structural_tag(line: &str) -> bool {
    for tag in ["@struct", "@union", "@enum", "@file"] {
        if let Some(rest) = line.strip_prefix(tag)
            && (rest.is_empty() || rest.starts_with(char::is_whitespace))
        {
            return true;
        }
    }
    false
}

/// Strips the ` * ` decoration a block-comment line usually carries.
fn strip_comment_decoration(line: &str) -> String {
    let trimmed = line.trim_start();
    let trimmed = trimmed.strip_prefix('*').unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix(' ').unwrap_or(trimmed);
    trimmed.trim_end().to_string()
}
