//! Static reference data: link directories, target roles and the outbound
//! search URLs built from them.

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub name: &'static str,
    pub url: &'static str,
}

const fn link(name: &'static str, url: &'static str) -> Link {
    Link { name, url }
}

#[derive(Debug, Clone, Copy)]
pub struct LinkGroup {
    pub key: &'static str,
    pub title: &'static str,
    pub links: &'static [Link],
}

pub const AGENCIES: &[Link] = &[
    link("Bob the Robot", "https://bobtherobot.fi/careers"),
    link("TBWA\\Helsinki", "https://tbwa.fi/careers"),
    link("SEK", "https://www.sek.fi/tyopaikat"),
    link("Futurice", "https://futurice.com/careers"),
    link("N2 Creative", "https://n2.fi/rekry"),
    link("hasan & partners", "https://hasanpartners.fi/careers"),
    link("Miltton", "https://www.miltton.com/careers"),
    link("Valve", "https://www.valve.fi/ura"),
    link("Avidly", "https://www.avidlyagency.com/fi/tyopaikat"),
    link("Reaktor", "https://www.reaktor.com/careers"),
    link("Vincit", "https://www.vincit.com/fi/ura"),
    link("Siili Solutions", "https://www.siili.com/urat"),
];

pub const SITES_INTL: &[Link] = &[
    link("Krop", "https://www.krop.com/"),
    link("Design Jobs Board", "https://www.designjobsboard.com/"),
    link("If You Could Jobs", "https://ifyoucouldjobs.com/"),
    link("Authentic Jobs", "https://authenticjobs.com/"),
    link("Awwwards Jobs", "https://www.awwwards.com/jobs/"),
    link("Coroflot Jobs", "https://www.coroflot.com/design-jobs"),
    link("ArtStation Jobs", "https://www.artstation.com/jobs"),
    link("No Fluff Jobs", "https://nofluffjobs.com/fi/design"),
    link("Remotive", "https://remotive.com/remote-jobs/design"),
    link("Remote OK", "https://remoteok.com/remote-design-jobs"),
    link("We Work Remotely", "https://weworkremotely.com/"),
    link("FlexJobs", "https://www.flexjobs.com/jobs/design"),
    link("Talenthouse Jobs", "https://www.talenthouse.com/jobs"),
    link("Domestika Jobs", "https://www.domestika.org/en/jobs"),
    link("Smashing Magazine", "https://www.smashingmagazine.com/jobs/"),
    link("UX Jobs Board", "https://www.uxjobsboard.com/"),
];

pub const SITES_FI_NORDIC: &[Link] = &[
    link("Journalistiliiton työpaikat", "https://journalistiliitto.fi/fi/tyoelama/avoimet-tyopaikat/"),
    link("Medialiiton työpaikat", "https://www.medialiitto.fi/tyopaikat"),
    link("Kulttuurijobs", "https://kulttuurijobs.fi/"),
    link("Film & TV Finland", "https://www.filmikamari.fi/"),
    link("Nordic Film Commissions", "https://nordicfilmcommissions.com/"),
    link("Scandinavian Design Jobs", "https://scandinaviandesign.com/jobs/"),
];

pub const SITES_MEDIA: &[Link] = &[
    link("Stage 32 Jobs", "https://www.stage32.com/find-jobs"),
    link("Media Match", "https://www.media-match.com/"),
    link("ProductionHUB", "https://www.productionhub.com/jobs"),
    link("Staff Me Up", "https://staffmeup.com/jobs"),
    link("ScreenSkills", "https://www.screenskills.com/opportunities/jobs/"),
];

pub const COURSES: &[Link] = &[
    link("Elements of AI", "https://www.elementsofai.com/"),
    link("MOOC.fi", "https://www.mooc.fi/"),
    link("Google UX Design Certificate", "https://www.coursera.org/professional-certificates/google-ux-design"),
    link("Interaction Design Foundation", "https://www.interaction-design.org/courses"),
    link("Domestika Courses", "https://www.domestika.org/en/courses"),
];

pub const LINK_GROUPS: &[LinkGroup] = &[
    LinkGroup { key: "agencies", title: "Agencies", links: AGENCIES },
    LinkGroup { key: "intl", title: "International", links: SITES_INTL },
    LinkGroup { key: "nordic", title: "Finland & Nordics", links: SITES_FI_NORDIC },
    LinkGroup { key: "media", title: "Media", links: SITES_MEDIA },
    LinkGroup { key: "courses", title: "Training courses", links: COURSES },
];

pub const PORTFOLIO_URL: &str = "https://janmyllymaki.wixsite.com/future-maker/fi";

/// Portfolio parts a work sample can be linked from.
pub const PORTFOLIO_SECTIONS: &[&str] = &[
    "Video CV",
    "Showreel",
    "Case: Brand renewal",
    "Case: Social media campaign",
    "Other",
];

pub const TARGET_ROLES: &[&str] = &[
    "Graafinen suunnittelija",
    "Sisällöntuottaja",
    "Visuaalinen suunnittelija",
    "Projektipäällikkö (luovat sisällöt)",
    "Viestintäsuunnittelija",
    "Markkinointisuunnittelija",
    "UI/UX-suunnittelija",
    "Creative Producer",
    "Content Manager",
    "Art Director Assistant",
];

pub const SEARCH_KEYWORDS: &[&str] = &[
    "graafinen suunnittelija",
    "sisällöntuottaja",
    "visuaalinen suunnittelija",
    "projektipäällikkö",
    "viestintäsuunnittelija",
    "markkinointisuunnittelija",
    "UI designer",
    "UX designer",
    "creative producer",
    "content manager",
    "art director assistant",
];

const LINKEDIN_SEARCH: &str = "https://www.linkedin.com/jobs/search/";
const LINKEDIN_LOCATION: &str = "Helsinki Metropolitan Area";
const JOB_MARKET_SEARCH: &str = "https://tyomarkkinatori.fi/henkiloasiakkaat/avoimet-tyopaikat/";
const JOB_MARKET_REGION: &str = "Uusimaa";

pub fn find_group(key: &str) -> Option<&'static LinkGroup> {
    let key = key.to_lowercase();
    LINK_GROUPS.iter().find(|group| group.key == key)
}

/// Boolean LinkedIn query over every search keyword, limited to the last
/// 30 days around Helsinki, newest first.
pub fn linkedin_search_url() -> String {
    let quoted: Vec<String> = SEARCH_KEYWORDS.iter().map(|k| format!("\"{k}\"")).collect();
    let keywords = format!("({}) AND (Portfolio OR Case OR AI)", quoted.join(" OR "));

    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("keywords", &keywords)
        .append_pair("location", LINKEDIN_LOCATION)
        .append_pair("f_TPR", "r2592000")
        .append_pair("sort", "dd")
        .finish();
    format!("{LINKEDIN_SEARCH}?{query}")
}

/// Search on the national job market portal, restricted to Uusimaa.
pub fn job_market_search_url() -> String {
    let keywords: Vec<String> = SEARCH_KEYWORDS
        .iter()
        .map(|k| urlencoding::encode(k).into_owned())
        .collect();
    format!("{JOB_MARKET_SEARCH}?q={}&region={JOB_MARKET_REGION}", keywords.join("%20"))
}

/// Case-insensitive lookup; the `Case: ` prefix may be left out.
pub fn portfolio_section(name: &str) -> Option<&'static str> {
    let wanted = name.trim().to_lowercase();
    PORTFOLIO_SECTIONS.iter().copied().find(|section| {
        let section = section.to_lowercase();
        section == wanted || section.strip_prefix("case: ") == Some(wanted.as_str())
    })
}

pub fn favicon_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(format!("https://www.google.com/s2/favicons?domain={host}&sz=64"))
}
