use crate::model::{FormattingSpan, Note, SpanKind};

mod styled;

pub use styled::{
    StyledRun, StyledText, StyledTextError, TextStyle, BODY_SIZE_PT, HEADER_SIZE_PT,
};

/// Per run, emits HEADER then BOLD then ITALIC for whichever apply.
pub fn encode(styled: &StyledText) -> Vec<FormattingSpan> {
    let mut spans = Vec::new();
    for run in styled.runs() {
        if run.style.is_header() {
            spans.push(FormattingSpan::new(SpanKind::Header, run.start, run.length));
        }
        if run.style.bold {
            spans.push(FormattingSpan::new(SpanKind::Bold, run.start, run.length));
        }
        if run.style.italic {
            spans.push(FormattingSpan::new(SpanKind::Italic, run.start, run.length));
        }
    }
    spans
}

/// Later spans replace the whole style over their range; out-of-bounds spans are skipped.
pub fn decode(content: &str, spans: &[FormattingSpan]) -> StyledText {
    let mut styled = StyledText::plain(content);
    let len = styled.len_utf16();
    for span in spans {
        if !span.is_valid_for_len(len) {
            tracing::trace!(
                kind = %span.kind,
                location = span.location,
                length = span.length,
                content_len = len,
                "skipping out-of-range formatting span"
            );
            continue;
        }
        styled.apply_style(
            span.location as usize,
            span.length as usize,
            style_for(span.kind),
        );
    }
    styled
}

pub fn decode_note(note: &Note) -> StyledText {
    decode(&note.content, &note.formattings)
}

pub fn style_for(kind: SpanKind) -> TextStyle {
    match kind {
        SpanKind::Header => TextStyle::HEADER,
        SpanKind::Bold => TextStyle::BOLD,
        SpanKind::Italic => TextStyle::ITALIC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles_per_unit(styled: &StyledText) -> Vec<TextStyle> {
        (0..styled.len_utf16())
            .filter_map(|offset| styled.style_at(offset))
            .collect()
    }

    #[test]
    fn encode_emits_one_span_per_exhibited_attribute() -> anyhow::Result<()> {
        let styled = StyledText::from_runs(
            "Title body more",
            vec![
                StyledRun::new(0, 5, TextStyle::HEADER),
                StyledRun::new(5, 1, TextStyle::BODY),
                StyledRun::new(
                    6,
                    4,
                    TextStyle {
                        bold: true,
                        italic: true,
                        size_pt: BODY_SIZE_PT,
                    },
                ),
                StyledRun::new(10, 5, TextStyle::BODY),
            ],
        )?;
        assert_eq!(
            encode(&styled),
            vec![
                FormattingSpan::new(SpanKind::Header, 0, 5),
                FormattingSpan::new(SpanKind::Bold, 0, 5),
                FormattingSpan::new(SpanKind::Bold, 6, 4),
                FormattingSpan::new(SpanKind::Italic, 6, 4),
            ]
        );
        Ok(())
    }

    #[test]
    fn encode_treats_large_text_as_header_even_without_bold() -> anyhow::Result<()> {
        let styled = StyledText::from_runs(
            "Big",
            vec![StyledRun::new(
                0,
                3,
                TextStyle {
                    bold: false,
                    italic: false,
                    size_pt: 30.0,
                },
            )],
        )?;
        assert_eq!(
            encode(&styled),
            vec![FormattingSpan::new(SpanKind::Header, 0, 3)]
        );
        Ok(())
    }

    #[test]
    fn encode_of_empty_or_plain_text_is_empty() {
        assert!(encode(&StyledText::plain("")).is_empty());
        assert!(encode(&StyledText::plain("nothing styled")).is_empty());
    }

    #[test]
    fn encode_is_deterministic() -> anyhow::Result<()> {
        let styled = StyledText::from_runs(
            "abc",
            vec![
                StyledRun::new(0, 1, TextStyle::ITALIC),
                StyledRun::new(1, 2, TextStyle::HEADER),
            ],
        )?;
        assert_eq!(encode(&styled), encode(&styled));
        Ok(())
    }

    #[test]
    fn round_trip_preserves_non_overlapping_styles() -> anyhow::Result<()> {
        let original = StyledText::from_runs(
            "Header\nsome bold and italic text",
            vec![
                StyledRun::new(0, 6, TextStyle::ITALIC),
                StyledRun::new(6, 6, TextStyle::BODY),
                StyledRun::new(12, 4, TextStyle::BOLD),
                StyledRun::new(16, 5, TextStyle::BODY),
                StyledRun::new(21, 6, TextStyle::ITALIC),
                StyledRun::new(27, 5, TextStyle::BODY),
            ],
        )?;
        let decoded = decode(original.content(), &encode(&original));
        assert_eq!(styles_per_unit(&decoded), styles_per_unit(&original));
        assert_eq!(decoded, original);
        Ok(())
    }

    #[test]
    fn later_span_overwrites_earlier_style_entirely() {
        let spans = [
            FormattingSpan::new(SpanKind::Bold, 0, 2),
            FormattingSpan::new(SpanKind::Italic, 0, 2),
        ];
        let styled = decode("ab", &spans);
        assert_eq!(styled.runs(), &[StyledRun::new(0, 2, TextStyle::ITALIC)]);
        let style = styled.runs()[0].style;
        assert!(style.italic);
        assert!(!style.bold);
    }

    #[test]
    fn header_then_bold_drops_the_header_size() {
        let spans = [
            FormattingSpan::new(SpanKind::Header, 0, 4),
            FormattingSpan::new(SpanKind::Bold, 0, 4),
        ];
        let styled = decode("Head", &spans);
        assert_eq!(styled.runs(), &[StyledRun::new(0, 4, TextStyle::BOLD)]);
    }

    #[test]
    fn header_run_decodes_as_bold_after_round_trip() -> anyhow::Result<()> {
        // A header run is bold as well, so it encodes to HEADER then BOLD and
        // the BOLD span wins on decode.
        let original =
            StyledText::from_runs("Head", vec![StyledRun::new(0, 4, TextStyle::HEADER)])?;
        let decoded = decode(original.content(), &encode(&original));
        assert_eq!(decoded.runs(), &[StyledRun::new(0, 4, TextStyle::BOLD)]);
        Ok(())
    }

    #[test]
    fn bold_italic_run_does_not_survive_round_trip() -> anyhow::Result<()> {
        let both = TextStyle {
            bold: true,
            italic: true,
            size_pt: BODY_SIZE_PT,
        };
        let original = StyledText::from_runs("xy", vec![StyledRun::new(0, 2, both)])?;
        let decoded = decode(original.content(), &encode(&original));
        assert_eq!(decoded.style_at(0), Some(TextStyle::ITALIC));
        Ok(())
    }

    #[test]
    fn partial_overlap_only_replaces_the_shared_range() {
        let spans = [
            FormattingSpan::new(SpanKind::Bold, 0, 4),
            FormattingSpan::new(SpanKind::Italic, 2, 4),
        ];
        let styled = decode("abcdef", &spans);
        assert_eq!(
            styled.runs(),
            &[
                StyledRun::new(0, 2, TextStyle::BOLD),
                StyledRun::new(2, 4, TextStyle::ITALIC),
            ]
        );
    }

    #[test]
    fn out_of_range_span_is_dropped_silently() {
        let styled = decode("hi", &[FormattingSpan::new(SpanKind::Bold, 5, 2)]);
        assert_eq!(styled, StyledText::plain("hi"));
    }

    #[test]
    fn invalid_spans_do_not_block_later_valid_ones() {
        let spans = [
            FormattingSpan {
                kind: SpanKind::Header,
                location: -3,
                length: 4,
            },
            FormattingSpan::new(SpanKind::Bold, 1, 10),
            FormattingSpan::new(SpanKind::Italic, 0, 1),
        ];
        let styled = decode("hey", &spans);
        assert_eq!(
            styled.runs(),
            &[
                StyledRun::new(0, 1, TextStyle::ITALIC),
                StyledRun::new(1, 2, TextStyle::BODY),
            ]
        );
    }

    #[test]
    fn offsets_count_utf16_code_units() {
        // The emoji occupies two code units, so "ok" starts at offset 3.
        let content = "😀 ok";
        let styled = decode(content, &[FormattingSpan::new(SpanKind::Bold, 3, 2)]);
        let bold_run = styled.runs()[1];
        assert_eq!(bold_run, StyledRun::new(3, 2, TextStyle::BOLD));
        assert_eq!(styled.run_text(&bold_run), "ok");

        let spans = encode(&styled);
        assert_eq!(spans, vec![FormattingSpan::new(SpanKind::Bold, 3, 2)]);
    }

    #[test]
    fn decode_note_uses_stored_formattings() {
        use time::macros::datetime;

        let note = Note::new("Dear diary", datetime!(2024-03-06 09:30 UTC))
            .with_formattings(vec![FormattingSpan::new(SpanKind::Header, 0, 4)]);
        let styled = decode_note(&note);
        assert_eq!(styled.style_at(0), Some(TextStyle::HEADER));
        assert_eq!(styled.style_at(4), Some(TextStyle::BODY));
    }
}
