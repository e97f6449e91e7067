pub struct WarnEvent<'a> {
    pub code: &'a str,
    pub stage: &'a str,
    pub action: &'a str,
    pub id: &'a str,
    pub source: &'a str,
    pub reason: &'a str,
    pub err: &'a str,
}

fn sanitize_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_ascii_whitespace() {
            if !out.is_empty() && !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else if ch.is_ascii_graphic() {
            out.push(ch);
            prev_sep = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "na".to_string()
    } else {
        trimmed.to_string()
    }
}

fn render(event: &WarnEvent<'_>) -> String {
    format!(
        "NEWS_WARN code={} stage={} action={} id={} source={} reason={} err={}",
        sanitize_value(event.code),
        sanitize_value(event.stage),
        sanitize_value(event.action),
        sanitize_value(event.id),
        sanitize_value(event.source),
        sanitize_value(event.reason),
        sanitize_value(event.err),
    )
}

pub fn emit(event: WarnEvent<'_>) {
    eprintln!("{}", render(&event));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_value_rewrites_whitespace() {
        assert_eq!(sanitize_value("a b\tc"), "a_b_c");
    }

    #[test]
    fn sanitize_value_falls_back_for_empty() {
        assert_eq!(sanitize_value("   "), "na");
    }

    #[test]
    fn render_produces_single_key_value_line() {
        let line = render(&WarnEvent {
            code: "E003_ANNOTATE_FAILED",
            stage: "reconcile",
            action: "skip-identifier",
            id: "42",
            source: "feed.csv",
            reason: "record has no display name",
            err: "",
        });
        assert_eq!(
            line,
            "NEWS_WARN code=E003_ANNOTATE_FAILED stage=reconcile action=skip-identifier id=42 \
             source=feed.csv reason=record_has_no_display_name err=na"
        );
    }
}
