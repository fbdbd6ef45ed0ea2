//! Document → visual tree. Pure and deterministic: the same document and config
//! always produce the same tree.

use crate::models::options::{RenderConfig, Section};
use crate::models::resume::{Education, Experience, ResumeDocument, SkillCategory, Skills};
use crate::render::color::AccentColor;
use crate::render::theme::{palette, Palette};
use crate::render::tree::{
    Align, Block, Border, BorderSide, BoxStyle, Edges, Flow, FlowItem, Node, Pill, Role, Split,
    TextRun, TextStyle, VisualTree, Weight,
};

/// Tint strengths per element. Theme never changes these.
pub const HEADER_RULE_ALPHA: f32 = 0.3;
pub const ENTRY_RULE_ALPHA: f32 = 0.4;
pub const SKILL_TAG_ALPHA: f32 = 0.15;

const BASE_SIZE: f32 = 14.0;
const PAGE_PADDING: f32 = 32.0;
const SECTION_SPACING: f32 = 24.0;
const ENTRY_SPACING: f32 = 16.0;

/// Renders `doc` with `config` into a visual tree.
pub fn render(doc: &ResumeDocument, config: &RenderConfig) -> VisualTree {
    let painter = Styler {
        palette: palette(config.theme),
        accent: config.accent_color,
    };

    let mut children = vec![painter.header(doc)];

    if config.shows(Section::Summary) {
        children.push(painter.section(
            Section::Summary,
            vec![Node::Text(TextRun::new(
                Role::Summary,
                doc.summary.as_str(),
                TextStyle::new(BASE_SIZE, painter.palette.text).line_height(1.625),
            ))],
        ));
    }

    if config.shows(Section::Experience) {
        let entries = doc.experience.iter().map(|job| painter.experience(job)).collect();
        children.push(painter.section(Section::Experience, vec![painter.entries(entries)]));
    }

    if config.shows(Section::Education) {
        let entries = doc.education.iter().map(|edu| painter.education(edu)).collect();
        children.push(painter.section(Section::Education, vec![painter.entries(entries)]));
    }

    if config.shows(Section::Skills) {
        children.push(painter.section(Section::Skills, painter.skills(&doc.skills)));
    }

    // The last section carries no trailing space.
    if let Some(Node::Block(last)) = children.last_mut() {
        if last.role != Role::Header {
            last.style.margin_bottom = 0.0;
        }
    }

    VisualTree {
        theme: config.theme,
        root: Node::Block(Block {
            role: Role::Document,
            style: BoxStyle {
                background: Some(painter.palette.background),
                padding: Edges::all(PAGE_PADDING),
                ..Default::default()
            },
            children,
        }),
    }
}

pub fn section_title(section: Section) -> &'static str {
    match section {
        Section::Summary => "Professional Summary",
        Section::Experience => "Work Experience",
        Section::Education => "Education",
        Section::Skills => "Skills",
    }
}

/// LinkedIn URLs are shown without scheme and `www.`.
pub fn display_linkedin(url: &str) -> String {
    url.replacen("https://", "", 1).replacen("www.", "", 1)
}

struct Styler {
    palette: Palette,
    accent: AccentColor,
}

impl Styler {
    fn header(&self, doc: &ResumeDocument) -> Node {
        let info = &doc.personal_info;
        let contact_style = TextStyle::new(BASE_SIZE, self.palette.muted);
        let contact = |text: String| FlowItem {
            run: TextRun::new(Role::Contact, text, contact_style),
            pill: None,
        };

        let mut email = contact(info.email.clone());
        email.run = email.run.link(format!("mailto:{}", info.email));
        let phone = contact(info.phone.clone());
        let mut linkedin = contact(display_linkedin(&info.linkedin));
        linkedin.run = linkedin.run.link(info.linkedin.clone());

        Node::Block(Block {
            role: Role::Header,
            style: BoxStyle {
                border: Some(Border {
                    side: BorderSide::Bottom,
                    width: 2.0,
                    color: self.accent.tint(HEADER_RULE_ALPHA),
                }),
                padding: Edges::bottom(24.0),
                margin_bottom: SECTION_SPACING,
                gap: 8.0,
                ..Default::default()
            },
            children: vec![
                Node::Text(TextRun::new(
                    Role::Name,
                    info.name.as_str(),
                    TextStyle::new(36.0, self.accent.solid())
                        .weight(Weight::Bold)
                        .centered()
                        .line_height(1.15),
                )),
                Node::Text(TextRun::new(
                    Role::Title,
                    info.title.as_str(),
                    TextStyle::new(20.0, self.palette.subtle)
                        .weight(Weight::Semibold)
                        .centered()
                        .line_height(1.4),
                )),
                Node::Flow(Flow {
                    role: Role::Contacts,
                    items: vec![email, phone, linkedin],
                    align: Align::Center,
                    gap_x: 24.0,
                    gap_y: 8.0,
                    margin_bottom: 0.0,
                }),
            ],
        })
    }

    fn section(&self, section: Section, mut body: Vec<Node>) -> Node {
        let heading = Node::Block(Block {
            role: Role::SectionHeading(section),
            style: BoxStyle {
                border: Some(Border {
                    side: BorderSide::Bottom,
                    width: 1.0,
                    color: self.palette.rule,
                }),
                padding: Edges::bottom(8.0),
                margin_bottom: if section == Section::Summary { 12.0 } else { 16.0 },
                ..Default::default()
            },
            children: vec![Node::Text(TextRun::new(
                Role::SectionHeading(section),
                section_title(section),
                TextStyle::new(20.0, self.accent.solid())
                    .weight(Weight::Bold)
                    .line_height(1.4),
            ))],
        });

        let mut children = Vec::with_capacity(body.len() + 1);
        children.push(heading);
        children.append(&mut body);

        Node::Block(Block {
            role: Role::Section(section),
            style: BoxStyle {
                margin_bottom: SECTION_SPACING,
                ..Default::default()
            },
            children,
        })
    }

    fn entries(&self, entries: Vec<Node>) -> Node {
        Node::Block(Block {
            role: Role::Entries,
            style: BoxStyle {
                gap: ENTRY_SPACING,
                ..Default::default()
            },
            children: entries,
        })
    }

    fn entry_block(&self, children: Vec<Node>) -> Node {
        Node::Block(Block {
            role: Role::Entry,
            style: BoxStyle {
                border: Some(Border {
                    side: BorderSide::Left,
                    width: 2.0,
                    color: self.accent.tint(ENTRY_RULE_ALPHA),
                }),
                padding: Edges::left(16.0),
                gap: 4.0,
                ..Default::default()
            },
            children,
        })
    }

    fn entry_heading(&self, title: &str, dates: &str) -> Node {
        Node::Split(Split {
            role: Role::EntryHeading,
            left: TextRun::new(
                Role::EntryTitle,
                title,
                TextStyle::new(18.0, self.palette.strong)
                    .weight(Weight::Bold)
                    .line_height(1.55),
            ),
            right: TextRun::new(
                Role::EntryDates,
                dates,
                TextStyle::new(BASE_SIZE, self.palette.muted).weight(Weight::Medium),
            ),
            margin_bottom: 0.0,
        })
    }

    fn experience(&self, job: &Experience) -> Node {
        let mut children = vec![
            self.entry_heading(&job.title, &job.dates),
            Node::Text(TextRun::new(
                Role::Company,
                job.company.as_str(),
                TextStyle::new(16.0, self.accent.solid()).weight(Weight::Semibold),
            )),
        ];
        children.extend(job.achievements.iter().map(|achievement| {
            Node::Text(
                TextRun::new(
                    Role::Achievement,
                    achievement.as_str(),
                    TextStyle::new(BASE_SIZE, self.palette.list),
                )
                .marker('•'),
            )
        }));
        self.entry_block(children)
    }

    fn education(&self, edu: &Education) -> Node {
        let mut children = vec![
            self.entry_heading(&edu.institution, &edu.dates),
            Node::Text(TextRun::new(
                Role::Degree,
                edu.degree.as_str(),
                TextStyle::new(16.0, self.palette.subtle).italic(),
            )),
        ];
        if let Some(details) = edu.visible_details() {
            children.push(Node::Text(TextRun::new(
                Role::Details,
                details,
                TextStyle::new(BASE_SIZE, self.palette.faint),
            )));
        }
        self.entry_block(children)
    }

    fn skills(&self, skills: &Skills) -> Vec<Node> {
        let categories: Vec<Node> = skills
            .categories()
            .filter(|(_, items)| !items.is_empty())
            .map(|(category, items)| self.skill_category(category, items))
            .collect();

        vec![Node::Block(Block {
            role: Role::Entries,
            style: BoxStyle {
                gap: ENTRY_SPACING,
                ..Default::default()
            },
            children: categories,
        })]
    }

    fn skill_category(&self, category: SkillCategory, items: &[String]) -> Node {
        let tag_style = TextStyle::new(12.0, self.accent.solid()).weight(Weight::Semibold);
        let pill = Pill {
            background: self.accent.tint(SKILL_TAG_ALPHA),
            pad_x: 10.0,
            pad_y: 2.0,
        };

        Node::Block(Block {
            role: Role::SkillCategory(category),
            style: BoxStyle {
                gap: 8.0,
                ..Default::default()
            },
            children: vec![
                Node::Text(TextRun::new(
                    Role::SkillCategoryLabel,
                    category.label(),
                    TextStyle::new(12.0, self.palette.subtle)
                        .weight(Weight::Semibold)
                        .uppercase(),
                )),
                Node::Flow(Flow {
                    role: Role::SkillTags,
                    items: items
                        .iter()
                        .map(|skill| FlowItem {
                            run: TextRun::new(Role::SkillTag, skill.as_str(), tag_style),
                            pill: Some(pill),
                        })
                        .collect(),
                    align: Align::Start,
                    gap_x: 8.0,
                    gap_y: 8.0,
                    margin_bottom: 0.0,
                }),
            ],
        })
    }
}
