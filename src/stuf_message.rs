//! StUF 0204 "Lv01" question message for an address (ADR) and its residents.

use crate::models::{Identifier, ReceiverIdentity, SenderIdentity};
use chrono::{Local, NaiveDateTime};
use quick_xml::escape::escape;

/// Namespace of the BG 0204 sector model (addresses, persons).
pub const BG_NAMESPACE: &str = "http://www.egem.nl/StUF/sector/bg/0204";
/// Namespace of the StUF 0204 envelope elements.
pub const STUF_NAMESPACE: &str = "http://www.egem.nl/StUF/StUF0204";
pub const SOAP_ENV_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Value of the `SOAPAction` header for a synchronous question.
pub const SOAP_ACTION: &str = "http://www.egem.nl/StUF/sector/bg/0204/beantwoordSynchroneVraag";
pub const CONTENT_TYPE: &str = "text/xml;charset=UTF-8";

/// Reference number quoted back by the register as `crossRefNummer`.
pub const REFERENCE_NUMBER: &str = "TGOLv01010";

/// Builds the question message using the current local time.
pub fn lv01_message(
    identifier: &Identifier,
    sender: &SenderIdentity,
    receiver: &ReceiverIdentity,
) -> String {
    lv01_message_at(identifier, sender, receiver, Local::now().naive_local())
}

/// Builds the question message with an explicit `tijdstipBericht`.
///
/// The body names the address twice by identifier and then asks for every
/// address field plus birth and death date of each resident, without filter
/// values.
///
/// # Arguments
///
/// * `identifier` - The location to ask about; escaped before embedding.
/// * `sender` - Sending application and user, escaped before embedding.
/// * `receiver` - Receiving application and organisation, escaped before embedding.
/// * `timestamp` - Rendered as `YYYYMMDDHHMMSS` in `tijdstipBericht`.
///
/// # Returns
///
/// * `String` - The complete SOAP envelope, ready to post.
pub fn lv01_message_at(
    identifier: &Identifier,
    sender: &SenderIdentity,
    receiver: &ReceiverIdentity,
    timestamp: NaiveDateTime,
) -> String {
    let bag_id = escape(identifier.as_str());

    format!(
        r#"<soapenv:Envelope xmlns:soapenv="{soap_env}" xmlns:ns="{bg}" xmlns:stuf="{stuf}" xmlns:StUF="StUF" xmlns:xsi="xsi">
   <soapenv:Header/>
   <soapenv:Body>
      <ns:vraagBericht>
         <stuf:stuurgegevens>
            <stuf:berichtsoort>Lv01</stuf:berichtsoort>
            <stuf:entiteittype>ADR</stuf:entiteittype>
            <stuf:sectormodel>BG</stuf:sectormodel>
            <stuf:versieStUF>0204</stuf:versieStUF>
            <stuf:versieSectormodel>0204</stuf:versieSectormodel>
            <stuf:zender>
               <stuf:applicatie>{sender_application}</stuf:applicatie>
               <stuf:gebruiker>{sender_user}</stuf:gebruiker>
            </stuf:zender>
            <stuf:ontvanger>
               <stuf:organisatie>{receiver_organisation}</stuf:organisatie>
               <stuf:applicatie>{receiver_application}</stuf:applicatie>
            </stuf:ontvanger>
            <stuf:referentienummer>{reference}</stuf:referentienummer>
            <stuf:tijdstipBericht>{timestamp}</stuf:tijdstipBericht>
            <stuf:vraag>
               <stuf:sortering>01</stuf:sortering>
               <stuf:maximumAantal>15</stuf:maximumAantal>
            </stuf:vraag>
         </stuf:stuurgegevens>
         <ns:body>
            <ns:ADR soortEntiteit="F">
               <identificatieNummerAanduiding>{bag_id}</identificatieNummerAanduiding>
            </ns:ADR>
            <ns:ADR soortEntiteit="F">
               <identificatieNummerAanduiding>{bag_id}</identificatieNummerAanduiding>
            </ns:ADR>
            <ns:ADR soortEntiteit="F">
               <postcode stuf:noValue="geenWaarde" xsi:nil="true"/>
               <woonplaatsnaam stuf:noValue="geenWaarde" xsi:nil="true"/>
               <straatnaam stuf:noValue="geenWaarde" xsi:nil="true"/>
               <huisnummer stuf:noValue="geenWaarde" xsi:nil="true"/>
               <huisletter stuf:noValue="geenWaarde" xsi:nil="true"/>
               <huisnummertoevoeging stuf:noValue="geenWaarde" xsi:nil="true"/>
               <identificatieNummerAanduiding stuf:noValue="geenWaarde" xsi:nil="true"/>
               <ADRPRSVBL soortEntiteit="R">
                  <PRS soortEntiteit="F">
                     <geboortedatum StUF:noValue="geenWaarde" xsi:nil="true"/>
                     <datumOverlijden StUF:noValue="geenWaarde" xsi:nil="true"/>
                  </PRS>
               </ADRPRSVBL>
            </ns:ADR>
         </ns:body>
      </ns:vraagBericht>
   </soapenv:Body>
</soapenv:Envelope>
"#,
        soap_env = SOAP_ENV_NAMESPACE,
        bg = BG_NAMESPACE,
        stuf = STUF_NAMESPACE,
        sender_application = escape(sender.application.as_str()),
        sender_user = escape(sender.user.as_str()),
        receiver_organisation = escape(receiver.organisation.as_str()),
        receiver_application = escape(receiver.application.as_str()),
        reference = REFERENCE_NUMBER,
        timestamp = timestamp.format("%Y%m%d%H%M%S"),
        bag_id = bag_id,
    )
}
