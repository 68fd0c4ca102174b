//! XML file extraction.

use quick_xml::Reader;
use quick_xml::events::Event;

use ripper_model::{DefinitionError, FieldDefinition, FieldRule, FieldValue, FileRow, FileType};

use crate::error::{ExtractError, Result};

/// A parsed XML element: name, accumulated text, direct children.
///
/// Attributes are not part of the extraction model and are dropped.
#[derive(Debug)]
struct XmlElement {
    name: String,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }
}

/// Extract one record per direct child of the configured record element.
///
/// The record element is resolved relative to the document root: the root
/// itself when the names match, otherwise the first direct child of the root
/// with that name.
pub fn extract_rows(
    fields: &[FieldDefinition],
    record_element: &str,
    content: &str,
) -> Result<Vec<FileRow>> {
    let document =
        parse_document(content)?.ok_or_else(|| ExtractError::MissingRecordContainer {
            element: record_element.to_string(),
        })?;
    let container = if document.name == record_element {
        &document
    } else {
        document
            .child(record_element)
            .ok_or_else(|| ExtractError::MissingRecordContainer {
                element: record_element.to_string(),
            })?
    };
    container
        .children
        .iter()
        .enumerate()
        .map(|(index, record)| build_row(fields, record, index + 1))
        .collect()
}

/// Apply field definitions to one record element. Composite fields recurse
/// into the named child element.
fn build_row(fields: &[FieldDefinition], element: &XmlElement, record: usize) -> Result<FileRow> {
    let mut row = FileRow::new();
    for field in fields {
        match field.rule() {
            FieldRule::Xml { node_name } => {
                let child = named_child(element, node_name, field.field_name(), record)?;
                row.push(
                    field.field_name(),
                    FieldValue::Text(child.text.trim().to_string()),
                );
            }
            FieldRule::XmlComposite {
                node_name,
                children,
            } => {
                let child = named_child(element, node_name, field.field_name(), record)?;
                let nested = build_row(children, child, record)?;
                row.push(field.field_name(), FieldValue::Composite(nested));
            }
            _ => {
                return Err(DefinitionError::FieldFormatMismatch {
                    field: field.field_name().to_string(),
                    expected: FileType::Xml,
                }
                .into());
            }
        }
    }
    Ok(row)
}

fn named_child<'a>(
    element: &'a XmlElement,
    node_name: &str,
    field: &str,
    record: usize,
) -> Result<&'a XmlElement> {
    element
        .child(node_name)
        .ok_or_else(|| ExtractError::MissingElement {
            record,
            field: field.to_string(),
            element: node_name.to_string(),
        })
}

/// Parse the whole document into an element tree. Returns `None` for a
/// document with no root element.
fn parse_document(content: &str) -> Result<Option<XmlElement>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(XmlElement::named(start.name().as_ref())),
            Event::Empty(start) => {
                let element = XmlElement::named(start.name().as_ref());
                attach(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(element, &mut stack, &mut root);
                }
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let decoded = text.unescape().map_err(quick_xml::Error::from)?;
                    parent.text.push_str(&decoded);
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    parent.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            // Declarations, comments and processing instructions carry no
            // record data.
            _ => {}
        }
    }

    Ok(root)
}

fn attach(element: XmlElement, stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            // Keep the first root; anything after it is not well-formed but
            // harmless to ignore.
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE_XML: &str = r"<people>
    <person>
        <name>Aaron</name>
        <age>39</age>
        <dob>09/04/1980</dob>
    </person>
    <person>
        <name>Gene</name>
        <age>61</age>
        <dob>01/15/1958</dob>
    </person>
    <person>
        <name>Xander</name>
        <age>5</age>
        <dob>11/22/2014</dob>
    </person>
    <person>
        <name>Mason</name>
        <age>12</age>
        <dob>04/13/2007</dob>
    </person>
</people>";

    fn person_fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::xml("name").unwrap(),
            FieldDefinition::xml("age").unwrap(),
            FieldDefinition::xml("dob").unwrap(),
        ]
    }

    #[test]
    fn extracts_records_from_container_children() {
        let rows = extract_rows(&person_fields(), "people", PEOPLE_XML).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].text("name"), Some("Aaron"));
        assert_eq!(rows[0].text("age"), Some("39"));
        assert_eq!(rows[1].text("name"), Some("Gene"));
        assert_eq!(rows[3].text("dob"), Some("04/13/2007"));
    }

    #[test]
    fn custom_node_names_are_honored() {
        let fields = vec![
            FieldDefinition::new(
                "age",
                FieldRule::Xml {
                    node_name: "personAge".to_string(),
                },
            )
            .unwrap(),
        ];
        let xml = "<people><person><personAge>39</personAge></person></people>";
        let rows = extract_rows(&fields, "people", xml).unwrap();
        assert_eq!(rows[0].text("age"), Some("39"));
    }

    #[test]
    fn missing_element_aborts_the_file() {
        let fields = vec![
            FieldDefinition::xml("name").unwrap(),
            FieldDefinition::xml("salary").unwrap(),
        ];
        let result = extract_rows(&fields, "people", PEOPLE_XML);
        match result {
            Err(ExtractError::MissingElement {
                record,
                field,
                element,
            }) => {
                assert_eq!(record, 1);
                assert_eq!(field, "salary");
                assert_eq!(element, "salary");
            }
            other => panic!("expected MissingElement, got {other:?}"),
        }
    }

    #[test]
    fn missing_record_container_is_an_error() {
        let result = extract_rows(&person_fields(), "employees", PEOPLE_XML);
        assert!(matches!(
            result,
            Err(ExtractError::MissingRecordContainer { element }) if element == "employees"
        ));
    }

    #[test]
    fn container_may_be_a_child_of_the_root() {
        let xml = "<export><people><person><name>Aaron</name></person></people></export>";
        let fields = vec![FieldDefinition::xml("name").unwrap()];
        let rows = extract_rows(&fields, "people", xml).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("name"), Some("Aaron"));
    }

    #[test]
    fn composite_fields_descend_into_child_elements() {
        let xml = r"<people>
            <person>
                <name>Aaron</name>
                <address>
                    <line1>123 Main St</line1>
                    <city>Des Moines</city>
                    <state>IA</state>
                    <zipCode>50315</zipCode>
                </address>
            </person>
        </people>";
        let fields = vec![
            FieldDefinition::xml("name").unwrap(),
            FieldDefinition::new(
                "address",
                FieldRule::XmlComposite {
                    node_name: "address".to_string(),
                    children: vec![
                        FieldDefinition::xml("line1").unwrap(),
                        FieldDefinition::xml("city").unwrap(),
                        FieldDefinition::xml("state").unwrap(),
                        FieldDefinition::xml("zipCode").unwrap(),
                    ],
                },
            )
            .unwrap(),
        ];

        let rows = extract_rows(&fields, "people", xml).unwrap();
        let address = rows[0]
            .get("address")
            .and_then(FieldValue::as_composite)
            .expect("composite address");
        assert_eq!(address.text("line1"), Some("123 Main St"));
        assert_eq!(address.text("city"), Some("Des Moines"));
        assert_eq!(address.text("state"), Some("IA"));
        assert_eq!(address.text("zipCode"), Some("50315"));
    }

    #[test]
    fn entities_are_unescaped() {
        let xml = "<people><person><name>A &amp; B</name></person></people>";
        let fields = vec![FieldDefinition::xml("name").unwrap()];
        let rows = extract_rows(&fields, "people", xml).unwrap();
        assert_eq!(rows[0].text("name"), Some("A & B"));
    }

    #[test]
    fn malformed_documents_fail_to_parse() {
        let result = extract_rows(&person_fields(), "people", "<people><person></people>");
        assert!(matches!(result, Err(ExtractError::XmlParse(_))));
    }
}
