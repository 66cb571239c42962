//! Reads StUF 0204 "La01" answers.
//!
//! The answer is streamed with a namespace-aware reader; every outermost
//! `BG:ADR` element becomes one address entry. Residents are the `BG:PRS`
//! elements anywhere below an address, and only their direct
//! `geboortedatum` / `datumOverlijden` children are read.

use crate::errors::LookupError;
use crate::models::{AddressDetails, AddressRecord, Identifier, PersonRecord};
use crate::stuf_message::BG_NAMESPACE;
use chrono::NaiveDate;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

/// One address from the answer. A malformed resident only fails its own
/// address.
pub type AddressEntry = Result<AddressRecord, LookupError>;

/// Parses a raw answer into its address entries.
///
/// # Arguments
///
/// * `identifier` - The location the answer belongs to, copied into every record.
/// * `body` - The raw answer bytes as received from the register.
///
/// # Returns
///
/// * `Result<Vec<AddressEntry>, LookupError>` - One entry per outermost
///   address, in document order. Fails with [`LookupError::Parse`] when the
///   bytes are not a well-formed document and with [`LookupError::NotFound`]
///   when it holds no address.
pub fn parse_answer(
    identifier: &Identifier,
    body: &[u8],
) -> Result<Vec<AddressEntry>, LookupError> {
    let mut reader = NsReader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut collector = Collector::new(identifier);
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut first_event = true;

    loop {
        let (namespace, event) = reader.read_resolved_event().map_err(|e| {
            tracing::warn!("Malformed StUF answer for {}: {}", identifier, e);
            LookupError::Parse
        })?;

        // An XML declaration is only allowed as the very first thing.
        if matches!(event, Event::Decl(_)) && !first_event {
            tracing::warn!("Misplaced XML declaration in answer for {}", identifier);
            return Err(LookupError::Parse);
        }
        first_event = false;

        match event {
            Event::Start(element) => {
                check_element(&element)?;
                if depth == 0 {
                    if root_seen {
                        return Err(LookupError::Parse);
                    }
                    root_seen = true;
                }
                depth += 1;
                let in_bg = is_bg(&namespace)?;
                collector.open(in_bg, element.local_name().as_ref(), depth);
            }
            Event::Empty(element) => {
                check_element(&element)?;
                if depth == 0 {
                    if root_seen {
                        return Err(LookupError::Parse);
                    }
                    root_seen = true;
                }
                let in_bg = is_bg(&namespace)?;
                collector.open(in_bg, element.local_name().as_ref(), depth + 1);
                collector.close(depth + 1);
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err(LookupError::Parse);
                }
                collector.close(depth);
                depth -= 1;
            }
            Event::Text(text) => {
                if depth == 0 {
                    return Err(LookupError::Parse);
                }
                let text = text.unescape().map_err(|_| LookupError::Parse)?;
                collector.text(&text);
            }
            Event::CData(data) => {
                if depth == 0 {
                    return Err(LookupError::Parse);
                }
                let text = std::str::from_utf8(&data).map_err(|_| LookupError::Parse)?;
                collector.text(text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen || depth != 0 {
        tracing::warn!("Incomplete StUF answer for {}", identifier);
        return Err(LookupError::Parse);
    }

    let entries = collector.finish();
    if entries.is_empty() {
        return Err(LookupError::NotFound);
    }
    Ok(entries)
}

/// Strict `YYYYMMDD` calendar date.
pub fn parse_birthdate(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d").ok()
}

/// Checks what the reader leaves unchecked on a start tag: the name must be
/// UTF-8 and every attribute must be quoted, unique and properly escaped.
fn check_element(element: &BytesStart) -> Result<(), LookupError> {
    std::str::from_utf8(element.name().as_ref()).map_err(|_| LookupError::Parse)?;

    for attribute in element.attributes().with_checks(true) {
        let attribute = attribute.map_err(|e| {
            tracing::warn!("Malformed attribute in StUF answer: {}", e);
            LookupError::Parse
        })?;
        std::str::from_utf8(attribute.key.as_ref()).map_err(|_| LookupError::Parse)?;
        if attribute.value.contains(&b'<') {
            return Err(LookupError::Parse);
        }
        attribute.unescape_value().map_err(|_| LookupError::Parse)?;
    }
    Ok(())
}

fn is_bg(namespace: &ResolveResult) -> Result<bool, LookupError> {
    match namespace {
        ResolveResult::Bound(ns) => Ok(ns.as_ref() == BG_NAMESPACE.as_bytes()),
        ResolveResult::Unbound => Ok(false),
        ResolveResult::Unknown(_) => Err(LookupError::Parse),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Postcode,
    Place,
    StreetName,
    HouseNumber,
    HouseLetter,
    HouseNumberAddition,
    Birthdate,
    DateOfDeath,
}

impl Field {
    fn of_address(local: &[u8]) -> Option<Self> {
        match local {
            b"postcode" => Some(Field::Postcode),
            b"woonplaatsnaam" => Some(Field::Place),
            b"straatnaam" => Some(Field::StreetName),
            b"huisnummer" => Some(Field::HouseNumber),
            b"huisletter" => Some(Field::HouseLetter),
            b"huisnummertoevoeging" => Some(Field::HouseNumberAddition),
            _ => None,
        }
    }

    fn of_person(local: &[u8]) -> Option<Self> {
        match local {
            b"geboortedatum" => Some(Field::Birthdate),
            b"datumOverlijden" => Some(Field::DateOfDeath),
            _ => None,
        }
    }
}

struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

#[derive(Default)]
struct ResidentDraft {
    depth: usize,
    birthdate: Option<String>,
    date_of_death: Option<String>,
}

#[derive(Default)]
struct AddressDraft {
    depth: usize,
    details: AddressDetails,
    residents: Vec<PersonRecord>,
    resident: Option<ResidentDraft>,
    malformed: bool,
}

impl AddressDraft {
    fn store(&mut self, field: Field, text: String) {
        let details = &mut self.details;
        let slot = match field {
            Field::Postcode => &mut details.postcode,
            Field::Place => &mut details.place,
            Field::StreetName => &mut details.street_name,
            Field::HouseNumber => &mut details.house_number,
            Field::HouseLetter => &mut details.house_letter,
            Field::HouseNumberAddition => &mut details.house_number_addition,
            Field::Birthdate | Field::DateOfDeath => {
                if let Some(resident) = self.resident.as_mut() {
                    if field == Field::Birthdate {
                        resident.birthdate = Some(text);
                    } else {
                        resident.date_of_death = Some(text);
                    }
                }
                return;
            }
        };
        *slot = Some(text).filter(|t| !t.is_empty());
    }

    fn finish_resident(&mut self, draft: ResidentDraft) {
        let mut person = PersonRecord {
            birthdate: None,
            date_of_death: draft.date_of_death,
        };
        let birthdate = draft.birthdate.as_deref().and_then(parse_birthdate);
        if person.is_alive() && birthdate.is_none() {
            tracing::warn!(
                "Resident without valid birthdate: {:?}",
                draft.birthdate.unwrap_or_default()
            );
            self.malformed = true;
        }
        person.birthdate = birthdate;
        self.residents.push(person);
    }
}

/// State of the address currently being read.
struct Collector<'a> {
    identifier: &'a Identifier,
    address: Option<AddressDraft>,
    capture: Option<Capture>,
    entries: Vec<AddressEntry>,
}

impl<'a> Collector<'a> {
    fn new(identifier: &'a Identifier) -> Self {
        Self {
            identifier,
            address: None,
            capture: None,
            entries: Vec::new(),
        }
    }

    fn open(&mut self, in_bg: bool, local: &[u8], depth: usize) {
        let Some(address) = self.address.as_mut() else {
            if in_bg && local == b"ADR" {
                self.address = Some(AddressDraft {
                    depth,
                    ..AddressDraft::default()
                });
            }
            return;
        };

        if !in_bg || self.capture.is_some() {
            return;
        }

        let resident_depth = address.resident.as_ref().map(|r| r.depth);
        let field = match resident_depth {
            Some(resident_depth) if depth == resident_depth + 1 => Field::of_person(local),
            Some(_) => None,
            None if local == b"PRS" => {
                address.resident = Some(ResidentDraft {
                    depth,
                    ..ResidentDraft::default()
                });
                None
            }
            None if depth == address.depth + 1 => Field::of_address(local),
            None => None,
        };

        if let Some(field) = field {
            self.capture = Some(Capture {
                field,
                depth,
                text: String::new(),
            });
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.text.push_str(text);
        }
    }

    fn close(&mut self, depth: usize) {
        let Some(address) = self.address.as_mut() else {
            return;
        };

        if self.capture.as_ref().is_some_and(|c| c.depth == depth) {
            if let Some(capture) = self.capture.take() {
                address.store(capture.field, capture.text.trim().to_string());
            }
        }

        if address.resident.as_ref().is_some_and(|r| r.depth == depth) {
            if let Some(resident) = address.resident.take() {
                address.finish_resident(resident);
            }
        }

        if address.depth == depth {
            if let Some(address) = self.address.take() {
                let entry = self.finish_address(address);
                self.entries.push(entry);
            }
        }
    }

    fn finish_address(&self, address: AddressDraft) -> AddressEntry {
        if address.malformed {
            return Err(LookupError::Parse);
        }
        Ok(AddressRecord {
            identifier: self.identifier.clone(),
            details: address.details,
            residents: address.residents,
        })
    }

    fn finish(self) -> Vec<AddressEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENVELOPE_OPEN: &str = r#"<?xml version='1.0' encoding='UTF-8'?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body><BG:synchroonAntwoordBericht xmlns:BG="http://www.egem.nl/StUF/sector/bg/0204" xmlns:StUF="http://www.egem.nl/StUF/StUF0204" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><StUF:stuurgegevens><StUF:berichtsoort>La01</StUF:berichtsoort><StUF:antwoord><StUF:crossRefNummer>TGOLv01010</StUF:crossRefNummer></StUF:antwoord></StUF:stuurgegevens><BG:body>"#;
    const ENVELOPE_CLOSE: &str = "</BG:body></BG:synchroonAntwoordBericht></soapenv:Body></soapenv:Envelope>";

    fn answer(body: &str) -> Vec<u8> {
        format!("{ENVELOPE_OPEN}{body}{ENVELOPE_CLOSE}").into_bytes()
    }

    fn person(birth: &str, death: &str) -> String {
        let birth = if birth.is_empty() {
            r#"<BG:geboortedatum xsi:nil="true" StUF:noValue="geenWaarde"/>"#.to_string()
        } else {
            format!("<BG:geboortedatum>{birth}</BG:geboortedatum>")
        };
        let death = if death.is_empty() {
            r#"<BG:datumOverlijden xsi:nil="true" StUF:noValue="geenWaarde"/>"#.to_string()
        } else {
            format!("<BG:datumOverlijden>{death}</BG:datumOverlijden>")
        };
        format!(
            r#"<BG:ADRPRSVBL soortEntiteit="R"><BG:PRS soortEntiteit="F">{birth}{death}</BG:PRS></BG:ADRPRSVBL>"#
        )
    }

    fn address(residents: &[String]) -> String {
        format!(
            r#"<BG:ADR soortEntiteit="F"><BG:postcode>1074ET</BG:postcode><BG:woonplaatsnaam xsi:nil="true" StUF:noValue="waardeOnbekend"/><BG:straatnaam>Rustenburgerstraat</BG:straatnaam><BG:huisnummer>14</BG:huisnummer><BG:huisletter>C</BG:huisletter>{}</BG:ADR>"#,
            residents.concat()
        )
    }

    fn id() -> Identifier {
        Identifier::new("0363200000399540").unwrap()
    }

    #[test]
    fn test_single_address_with_resident() {
        let body = answer(&address(&[person("19620412", "")]));
        let entries = parse_answer(&id(), &body).unwrap();
        assert_eq!(entries.len(), 1);

        let record = entries[0].as_ref().unwrap();
        assert_eq!(record.identifier, id());
        assert_eq!(record.details.postcode.as_deref(), Some("1074ET"));
        assert_eq!(record.details.place, None);
        assert_eq!(record.details.street_name.as_deref(), Some("Rustenburgerstraat"));
        assert_eq!(record.details.house_number.as_deref(), Some("14"));
        assert_eq!(record.details.house_letter.as_deref(), Some("C"));
        assert_eq!(record.details.house_number_addition, None);
        assert_eq!(
            record.residents,
            vec![PersonRecord {
                birthdate: NaiveDate::from_ymd_opt(1962, 4, 12),
                date_of_death: Some(String::new()),
            }]
        );
    }

    #[test]
    fn test_dead_resident_birthdate_not_validated() {
        let body = answer(&address(&[person("garbage", "20200101"), person("20100101", "")]));
        let entries = parse_answer(&id(), &body).unwrap();
        let record = entries[0].as_ref().unwrap();
        assert_eq!(record.residents.len(), 2);
        assert!(!record.residents[0].is_alive());
        assert!(record.residents[1].is_alive());
    }

    #[test]
    fn test_missing_death_element_means_alive() {
        let resident = r#"<BG:PRS><BG:geboortedatum>20000101</BG:geboortedatum></BG:PRS>"#;
        let body = answer(&format!("<BG:ADR>{resident}</BG:ADR>"));
        let entries = parse_answer(&id(), &body).unwrap();
        assert!(entries[0].as_ref().unwrap().residents[0].is_alive());
    }

    #[test]
    fn test_no_address_is_not_found() {
        let body = answer("");
        assert_eq!(parse_answer(&id(), &body), Err(LookupError::NotFound));

        let empty_body = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body><BG:body xmlns:BG="http://www.egem.nl/StUF/sector/bg/0204"/></soapenv:Body></soapenv:Envelope>"#;
        assert_eq!(
            parse_answer(&id(), empty_body.as_bytes()),
            Err(LookupError::NotFound)
        );
    }

    #[test]
    fn test_adr_outside_bg_namespace_is_ignored() {
        let body = answer(r#"<ADR xmlns="urn:other"><PRS/></ADR>"#);
        assert_eq!(parse_answer(&id(), &body), Err(LookupError::NotFound));
    }

    #[test]
    fn test_default_namespace_address_is_found() {
        let body = answer(
            r#"<ADR xmlns="http://www.egem.nl/StUF/sector/bg/0204"><PRS><geboortedatum>19900101</geboortedatum></PRS></ADR>"#,
        );
        let entries = parse_answer(&id(), &body).unwrap();
        assert_eq!(entries[0].as_ref().unwrap().residents.len(), 1);
    }

    #[test]
    fn test_malformed_birthdate_fails_only_its_address() {
        let body = answer(&format!(
            "{}{}",
            address(&[person("1962-04-12", "")]),
            address(&[person("19620412", "")])
        ));
        let entries = parse_answer(&id(), &body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], Err(LookupError::Parse));
        assert!(entries[1].is_ok());
    }

    #[test]
    fn test_missing_birthdate_of_alive_resident_fails_address() {
        let body = answer(&address(&[person("", "")]));
        let entries = parse_answer(&id(), &body).unwrap();
        assert_eq!(entries, vec![Err(LookupError::Parse)]);
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        for body in [
            &b""[..],
            b"not xml at all",
            b"<a><b></a>",
            b"<a></a><b></b>",
            b"<a>",
            b"<x:a></x:a>",
            b"<a>\xff\xfe</a>",
        ] {
            assert_eq!(parse_answer(&id(), body), Err(LookupError::Parse), "{:?}", body);
        }
    }

    #[test]
    fn test_broken_attributes_are_parse_error() {
        for body in [
            &b"<a b=1></a>"[..],
            b"<a b></a>",
            b"<a b=\"1\" b=\"2\"/>",
            b"<a b=\"<\"/>",
            b"<a b=\"&bogus;\"/>",
            b"<a b=\"\xff\"/>",
        ] {
            assert_eq!(parse_answer(&id(), body), Err(LookupError::Parse), "{:?}", body);
        }
    }

    #[test]
    fn test_non_utf8_tag_name_is_parse_error() {
        assert_eq!(parse_answer(&id(), b"<\xff/>"), Err(LookupError::Parse));
        assert_eq!(parse_answer(&id(), b"<a><\xff\xfe/></a>"), Err(LookupError::Parse));
    }

    #[test]
    fn test_misplaced_declaration_is_parse_error() {
        assert_eq!(
            parse_answer(&id(), b"<a/><?xml version=\"1.0\"?>"),
            Err(LookupError::Parse)
        );
        assert_eq!(
            parse_answer(&id(), b"<a><?xml version=\"1.0\"?></a>"),
            Err(LookupError::Parse)
        );
    }

    #[test]
    fn test_unquoted_attribute_on_address_rejects_whole_answer() {
        let body = answer(
            "<BG:ADR soortEntiteit=F><BG:PRS><BG:geboortedatum>19900101</BG:geboortedatum></BG:PRS></BG:ADR>",
        );
        assert_eq!(parse_answer(&id(), &body), Err(LookupError::Parse));
    }

    #[test]
    fn test_truncated_answer_is_parse_error() {
        let body = answer(&address(&[person("19620412", "")]));
        let cut = &body[..body.len() - 10];
        assert_eq!(parse_answer(&id(), cut), Err(LookupError::Parse));
    }

    #[test]
    fn test_birthdate_format_is_strict() {
        assert_eq!(parse_birthdate("19620412"), NaiveDate::from_ymd_opt(1962, 4, 12));
        assert_eq!(parse_birthdate(" 19620412 "), NaiveDate::from_ymd_opt(1962, 4, 12));
        assert_eq!(parse_birthdate("19621312"), None);
        assert_eq!(parse_birthdate("20230229"), None);
        assert_eq!(parse_birthdate("1962412"), None);
        assert_eq!(parse_birthdate("+1962041"), None);
        assert_eq!(parse_birthdate("196204120"), None);
        assert_eq!(parse_birthdate(""), None);
    }
}
