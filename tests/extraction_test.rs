//! Extraction tests over raw Gmail API payload structures

use gmail_summarizer::extractor::{extract_body_and_attachments, PayloadNode};
use google_gmail1::api::{MessagePart, MessagePartBody};

fn body(data: &[u8]) -> MessagePartBody {
    MessagePartBody {
        data: Some(data.to_vec()),
        ..Default::default()
    }
}

fn text_part(mime_type: &str, data: &str) -> MessagePart {
    MessagePart {
        mime_type: Some(mime_type.to_string()),
        body: Some(body(data.as_bytes())),
        ..Default::default()
    }
}

fn attachment_part(mime_type: &str, filename: &str, attachment_id: &str) -> MessagePart {
    MessagePart {
        mime_type: Some(mime_type.to_string()),
        filename: Some(filename.to_string()),
        body: Some(MessagePartBody {
            attachment_id: Some(attachment_id.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[test]
fn single_part_message() {
    let payload = text_part("text/plain", "Just a plain body.");

    let node = PayloadNode::from_part(payload);
    let extracted = extract_body_and_attachments(&node).unwrap();

    assert_eq!(extracted.body, "Just a plain body.");
    assert_eq!(extracted.attachment_count, 0);
}

#[test]
fn multipart_alternative_prefers_plain_text() {
    let payload = MessagePart {
        mime_type: Some("multipart/alternative".to_string()),
        parts: Some(vec![
            text_part("text/html", "<p>Styled <b>body</b></p>"),
            text_part("text/plain", "Plain body"),
        ]),
        ..Default::default()
    };

    let node = PayloadNode::from_part(payload);
    let extracted = extract_body_and_attachments(&node).unwrap();

    assert_eq!(extracted.body, "Plain body");
}

#[test]
fn mixed_message_with_nested_alternative_and_attachment() {
    // multipart/mixed
    //   multipart/alternative
    //     text/plain
    //     text/html
    //   application/pdf attachment
    let payload = MessagePart {
        mime_type: Some("multipart/mixed".to_string()),
        parts: Some(vec![
            MessagePart {
                mime_type: Some("multipart/alternative".to_string()),
                parts: Some(vec![
                    text_part("text/plain", "Quarterly numbers attached."),
                    text_part("text/html", "<p>Quarterly numbers attached.</p>"),
                ]),
                ..Default::default()
            },
            attachment_part("application/pdf", "q3.pdf", "att-42"),
        ]),
        ..Default::default()
    };

    let node = PayloadNode::from_part(payload);
    let extracted = extract_body_and_attachments(&node).unwrap();

    assert_eq!(extracted.body, "Quarterly numbers attached.");
    assert_eq!(extracted.attachment_count, 1);
    assert_eq!(extracted.attachment_names, vec!["q3.pdf"]);
}

#[test]
fn html_only_message_is_stripped() {
    let html = "<html><head><style>p { margin: 0 }</style></head>\
                <body><p>Your   order\nhas shipped.</p>\
                <script>track();</script></body></html>";
    let payload = MessagePart {
        mime_type: Some("multipart/alternative".to_string()),
        parts: Some(vec![text_part("text/html", html)]),
        ..Default::default()
    };

    let node = PayloadNode::from_part(payload);
    let extracted = extract_body_and_attachments(&node).unwrap();

    assert_eq!(extracted.body, "Your order has shipped.");
}

#[test]
fn message_with_no_body_data_extracts_empty() {
    let payload = MessagePart {
        mime_type: Some("text/plain".to_string()),
        ..Default::default()
    };

    let node = PayloadNode::from_part(payload);
    let extracted = extract_body_and_attachments(&node).unwrap();

    assert_eq!(extracted.body, "");
    assert_eq!(extracted.attachment_count, 0);
}
