use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use tera::{Context, Tera};
use tracing::debug;

pub const APP_TITLE: &str = "ST Chatbot";
pub const CHAT_ENDPOINT: &str = "/api/chat";

/// HTML pages served by the front controller. The lowercase name doubles
/// as the template file stem and the URL path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Page {
    Home,
    Stchatbot,
    History,
}

impl Page {
    pub fn template_name(self) -> String {
        format!("{self}.html")
    }

    pub fn path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Stchatbot => "/stchatbot",
            Page::History => "/history",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Stchatbot => "Chat",
            Page::History => "History",
        }
    }
}

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("home.html", include_str!("../../templates/home.html")),
    ("stchatbot.html", include_str!("../../templates/stchatbot.html")),
    ("history.html", include_str!("../../templates/history.html")),
];

/// Templates compiled once at startup.
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    pub fn render(&self, page: Page) -> Result<String, tera::Error> {
        let name: &'static str = page.into();
        let mut ctx = Context::new();
        ctx.insert("app_title", APP_TITLE);
        ctx.insert("page", name);
        ctx.insert("page_title", page.title());
        ctx.insert("chat_endpoint", CHAT_ENDPOINT);
        let html = self.tera.render(&page.template_name(), &ctx)?;
        debug!(page = %page, html_len = html.len(), "pages: rendered");
        Ok(html)
    }
}
