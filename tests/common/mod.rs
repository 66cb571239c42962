//! Shared fixtures for the integration tests: StUF answers and a lookup
//! pipeline pointed at a mock register.
#![allow(dead_code)]

use brp_brandweer::lookup::BrpLookup;
use brp_brandweer::models::{Identifier, ReceiverIdentity, SenderIdentity};
use brp_brandweer::stuf_client::StufClient;
use chrono::{Local, Months};
use std::time::Duration;
use wiremock::MockServer;

pub const SERVICE_PATH: &str = "/CGS/StUF/services/BGSynchroon/";
pub const BAG_ID: &str = "0363200000399540";

pub fn sender() -> SenderIdentity {
    SenderIdentity {
        application: "Meldkamer1".to_string(),
        user: "meld-sys-user".to_string(),
    }
}

pub fn receiver() -> ReceiverIdentity {
    ReceiverIdentity {
        application: "CGM".to_string(),
        organisation: "Amsterdam".to_string(),
    }
}

pub fn id(value: &str) -> Identifier {
    Identifier::new(value).unwrap()
}

/// Lookup pipeline posting to the mock server without client certificate.
pub fn mock_lookup(server: &MockServer, timeout: Duration) -> BrpLookup {
    let client = StufClient::plain(format!("{}{}", server.uri(), SERVICE_PATH), timeout).unwrap();
    BrpLookup::with_client(client, sender(), receiver())
}

/// `YYYYMMDD` birthdate of someone who turned `years` today.
pub fn born_years_ago(years: u32) -> String {
    Local::now()
        .date_naive()
        .checked_sub_months(Months::new(12 * years))
        .unwrap()
        .format("%Y%m%d")
        .to_string()
}

pub fn resident(birthdate: &str, date_of_death: Option<&str>) -> String {
    let death = match date_of_death {
        Some(date) => format!("<BG:datumOverlijden>{date}</BG:datumOverlijden>"),
        None => r#"<BG:datumOverlijden xsi:nil="true" StUF:noValue="geenWaarde"/>"#.to_string(),
    };
    format!(
        r#"<BG:ADRPRSVBL soortEntiteit="R"><BG:tijdvakRelatie><StUF:begindatumRelatie>20010501</StUF:begindatumRelatie></BG:tijdvakRelatie><BG:PRS soortEntiteit="F"><BG:geboortedatum>{birthdate}</BG:geboortedatum>{death}</BG:PRS></BG:ADRPRSVBL>"#
    )
}

pub fn address(house_number: &str, residents: &[String]) -> String {
    format!(
        r#"<BG:ADR soortEntiteit="F" StUF:sleutelVerzendend="9072717152486"><BG:postcode>1074ET</BG:postcode><BG:woonplaatsnaam xsi:nil="true" StUF:noValue="waardeOnbekend"/><BG:straatnaam>Rustenburgerstraat</BG:straatnaam><BG:huisnummer>{house_number}</BG:huisnummer><BG:huisletter>C</BG:huisletter><BG:huisnummertoevoeging xsi:nil="true" StUF:noValue="geenWaarde"/><BG:extraElementen><StUF:extraElement naam="identificatieNummerAanduiding">0363200000399540</StUF:extraElement></BG:extraElementen>{}</BG:ADR>"#,
        residents.concat()
    )
}

/// La01 answer envelope around the given address elements.
pub fn answer(addresses: &[String]) -> String {
    let body = if addresses.is_empty() {
        r#"<BG:body xmlns="http://www.egem.nl/StUF/sector/bg/0204"/>"#.to_string()
    } else {
        format!(
            r#"<BG:body xmlns="http://www.egem.nl/StUF/sector/bg/0204">{}</BG:body>"#,
            addresses.concat()
        )
    };
    format!(
        r#"<?xml version='1.0' encoding='UTF-8'?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body><BG:synchroonAntwoordBericht xmlns:BG="http://www.egem.nl/StUF/sector/bg/0204" xmlns:StUF="http://www.egem.nl/StUF/StUF0204" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><StUF:stuurgegevens xmlns="http://www.egem.nl/StUF/StUF0204"><StUF:berichtsoort>La01</StUF:berichtsoort><StUF:entiteittype>ADR</StUF:entiteittype><StUF:sectormodel>BG</StUF:sectormodel><StUF:versieStUF>0204</StUF:versieStUF><StUF:versieSectormodel>0204</StUF:versieSectormodel><StUF:referentienummer>MK0000008709</StUF:referentienummer><StUF:tijdstipBericht>2018013013011501</StUF:tijdstipBericht><StUF:antwoord><StUF:crossRefNummer>TGOLv01010</StUF:crossRefNummer></StUF:antwoord></StUF:stuurgegevens>{body}</BG:synchroonAntwoordBericht></soapenv:Body></soapenv:Envelope>"#
    )
}

/// Answer with one address and one 64-year-old resident.
pub fn single_resident_answer() -> String {
    answer(&[address("14", &[resident(&born_years_ago(64), None)])])
}
