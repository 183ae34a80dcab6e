//! Built-in roster of procurement portals: NASPO ValuePoint plus all 50 states.
//!
//! Used whenever the config file does not list its own `sources`.

use crate::models::SourceDescriptor;

/// (region, portal name, root URL)
const ROSTER: &[(&str, &str, &str)] = &[
    ("NASPO", "NASPO ValuePoint", "https://www.naspovaluepoint.org/portfolio/"),
    ("Alabama", "Alabama Procurement", "https://www.purchasing.alabama.gov"),
    ("Alaska", "Alaska Online Public Notices", "https://aws.state.ak.us/OnlinePublicNotices/"),
    (
        "Arizona",
        "Arizona SPO",
        "https://az.gov/services/business-services/business-contracting/state-procurement-office",
    ),
    ("Arkansas", "Arkansas Procurement", "https://www.dfa.arkansas.gov/offices/procurement/"),
    ("California", "Cal eProcure", "https://www.caleprocure.ca.gov"),
    ("Colorado", "Colorado Procurement", "https://www.colorado.gov/pacific/oit/procurement"),
    ("Connecticut", "Connecticut CTSource", "https://portal.ct.gov/DAS/CTSource/CTSource"),
    ("Delaware", "Delaware GSS", "https://gss.omb.delaware.gov/procurement"),
    ("Florida", "Florida VBS", "https://www.myflorida.com/apps/vbs/"),
    ("Georgia", "Georgia DOAS", "https://doas.ga.gov/state-purchasing"),
    ("Hawaii", "Hawaii SPO", "https://spo.hawaii.gov"),
    ("Idaho", "Idaho Purchasing", "https://gov.idaho.gov/dhr/purchasing/"),
    ("Illinois", "Illinois CMS", "https://www2.illinois.gov/cms/business/sell2/Pages/default.aspx"),
    ("Indiana", "Indiana IDOA", "https://www.in.gov/idoa/procurement/"),
    ("Iowa", "Iowa DAS", "https://das.iowa.gov/procurement"),
    ("Kansas", "Kansas Procurement", "https://admin.ks.gov/offices/procurement-and-contracts"),
    (
        "Kentucky",
        "Kentucky eProcurement",
        "https://finance.ky.gov/services/eprocurement/Pages/default.aspx",
    ),
    ("Louisiana", "Louisiana OSPP", "https://www.doa.la.gov/doa/ospp.htm"),
    ("Maine", "Maine Procurement", "https://www.maine.gov/dafs/bbm/procurementservices"),
    ("Maryland", "Maryland eMD", "https://procurement.maryland.gov"),
    (
        "Massachusetts",
        "Massachusetts OSD",
        "https://www.mass.gov/orgs/operational-services-division",
    ),
    ("Michigan", "Michigan DTMB", "https://www.michigan.gov/dtmb/procurement"),
    ("Minnesota", "Minnesota Admin", "https://mn.gov/admin/government/business/"),
    ("Mississippi", "Mississippi DFA", "https://www.dfa.ms.gov/dfa-offices/public-procurement/"),
    ("Missouri", "Missouri OA", "https://oa.mo.gov/purchasing"),
    ("Montana", "Montana GSD", "https://gsd.mt.gov/Procurement"),
    ("Nebraska", "Nebraska DAS", "https://das.nebraska.gov/materiel/purchasing.html"),
    ("Nevada", "Nevada Purchasing", "https://purchasing.nv.gov"),
    ("New Hampshire", "New Hampshire DAS", "https://www.nh.gov/das/procurement/"),
    ("New Jersey", "New Jersey START", "https://www.njstart.gov"),
    ("New Mexico", "New Mexico SPD", "https://www.generalservices.state.nm.us/state-purchasing/"),
    ("New York", "New York OGS", "https://www.ogs.ny.gov/procurement/"),
    ("North Carolina", "North Carolina IPS", "https://www.ips.state.nc.us"),
    ("North Dakota", "North Dakota OMB", "https://www.nd.gov/omb/procurement"),
    ("Ohio", "Ohio Procurement", "https://procure.ohio.gov"),
    ("Oklahoma", "Oklahoma DCS", "https://www.ok.gov/dcs/Purchasing_Division/"),
    ("Oregon", "Oregon DAS", "https://www.oregon.gov/das/procurement/pages/index.aspx"),
    ("Pennsylvania", "Pennsylvania eMarketplace", "https://www.emarketplace.state.pa.us"),
    ("Rhode Island", "Rhode Island Purchasing", "https://www.purchasing.ri.gov"),
    ("South Carolina", "South Carolina Procurement", "https://procurement.sc.gov"),
    (
        "South Dakota",
        "South Dakota BOA",
        "https://boa.sd.gov/central-services/procurement-management/",
    ),
    ("Tennessee", "Tennessee Procurement", "https://www.tn.gov/generalservices/procurement.html"),
    ("Texas", "Texas SmartBuy", "https://www.txsmartbuy.com"),
    ("Utah", "Utah Purchasing", "https://purchasing.utah.gov"),
    ("Vermont", "Vermont BGS", "https://bgs.vermont.gov/purchasing-contracting"),
    (
        "Virginia",
        "Virginia DGS",
        "https://www.dgs.virginia.gov/division-of-purchases-and-supply/procurement-and-solicitations/",
    ),
    ("Washington", "Washington DES", "https://des.wa.gov/services/contracting-purchasing"),
    ("West Virginia", "West Virginia Purchasing", "https://www.state.wv.us/admin/purchase/"),
    ("Wisconsin", "Wisconsin DOA", "https://www.wi.gov/Pages/agency.aspx?agency=163"),
    ("Wyoming", "Wyoming A&I", "https://ai.wyo.gov/general-services/procurement/"),
];

/// Portals that render their listings client-side.
const PLACEHOLDER_REGIONS: &[&str] = &["California", "Texas"];

/// The default roster. Cal eProcure and Texas SmartBuy use the placeholder
/// extractor.
pub fn default_roster() -> Vec<SourceDescriptor> {
    ROSTER
        .iter()
        .map(|&(region, name, url)| {
            let source = SourceDescriptor::new(region, name, url);
            if PLACEHOLDER_REGIONS.contains(&region) {
                source.with_override()
            } else {
                source
            }
        })
        .collect()
}
