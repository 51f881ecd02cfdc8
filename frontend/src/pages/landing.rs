use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::auth::flow::{AuthFlow, AuthMode, FlowAction};
use crate::auth::provider::Identity;
use crate::components::auth_modal::AuthModal;
use crate::components::button::{Button, ButtonSize, ButtonVariant};
use crate::components::card::Card;
use crate::components::session::use_session;
use crate::config::AppConfig;

const FEATURES: &[(&str, &str, Accent)] = &[
    (
        "Intelligent Document Analysis",
        "AI-powered validation ensures your documents meet specific requirements for each destination country, reducing rejection rates by 85%.",
        Accent::Primary,
    ),
    (
        "Automated Form Completion",
        "Smart pre-fill technology leverages your profile data to complete complex visa applications in minutes instead of hours.",
        Accent::Accent,
    ),
    (
        "Real-Time Processing Updates",
        "Track your application status with live updates from embassies and consulates, with predictive timeline estimates.",
        Accent::Primary,
    ),
    (
        "Multi-Country Management",
        "Plan complex itineraries across multiple destinations with automatic visa requirement mapping and timeline coordination.",
        Accent::Accent,
    ),
    (
        "Compliance Monitoring",
        "Stay within legal limits with automatic tracking of visa-free days, work authorization periods, and residency requirements.",
        Accent::Primary,
    ),
    (
        "Enterprise Integration",
        "White-label API for HR platforms, travel agencies, and universities to streamline organizational visa workflows.",
        Accent::Accent,
    ),
];

const STATS: &[(&str, &str)] = &[
    ("250M+", "Annual visa applications processed globally"),
    ("90%", "Application accuracy rate"),
    ("50+", "Supported destination countries"),
    ("<10min", "Average application completion time"),
];

const TRUST_BADGES: &[&str] = &["GDPR Compliant", "Bank-Level Security", "90% Success Rate"];

const FOOTER_COLUMNS: &[(&str, &[&str])] = &[
    ("Product", &["Features", "Pricing", "API"]),
    ("Company", &["About", "Careers", "Contact"]),
    ("Legal", &["Privacy", "Terms", "Security"]),
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Accent {
    Primary,
    Accent,
}

impl Accent {
    fn class(self) -> &'static str {
        match self {
            Accent::Primary => "feature-icon-primary",
            Accent::Accent => "feature-icon-accent",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct FeatureCardProps {
    pub title: AttrValue,
    pub description: AttrValue,
    pub accent: Accent,
}

#[function_component(FeatureCard)]
pub fn feature_card(props: &FeatureCardProps) -> Html {
    html! {
        <Card hover={true}>
            <div class={classes!("feature-icon", props.accent.class())}>
                <div class="feature-icon-inner"></div>
            </div>
            <h3 class="feature-title">{ props.title.clone() }</h3>
            <p class="feature-description">{ props.description.clone() }</p>
        </Card>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub number: AttrValue,
    pub label: AttrValue,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div>
            <div class="stat-number">{ props.number.clone() }</div>
            <div class="stat-label">{ props.label.clone() }</div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SiteHeaderProps {
    pub identity: Option<Identity>,
    pub on_open: Callback<AuthMode>,
    pub on_sign_out: Callback<()>,
}

#[function_component(SiteHeader)]
pub fn site_header(props: &SiteHeaderProps) -> Html {
    let is_scrolled = use_state(|| false);

    {
        let is_scrolled = is_scrolled.clone();
        use_effect_with_deps(
            move |_| {
                let window = web_sys::window();
                let scroll_callback = Closure::wrap(Box::new(move || {
                    let offset = web_sys::window()
                        .and_then(|w| w.scroll_y().ok())
                        .unwrap_or(0.0);
                    is_scrolled.set(offset > 8.0);
                }) as Box<dyn FnMut()>);

                if let Some(window) = &window {
                    let _ = window.add_event_listener_with_callback(
                        "scroll",
                        scroll_callback.as_ref().unchecked_ref(),
                    );
                }

                move || {
                    if let Some(window) = window {
                        let _ = window.remove_event_listener_with_callback(
                            "scroll",
                            scroll_callback.as_ref().unchecked_ref(),
                        );
                    }
                }
            },
            (),
        );
    }

    let open = |mode: AuthMode| {
        let on_open = props.on_open.clone();
        Callback::from(move |_: MouseEvent| on_open.emit(mode))
    };

    html! {
        <header class={classes!("site-header", (*is_scrolled).then_some("scrolled"))}>
            <nav class="container nav">
                <div class="brand">
                    <div class="brand-mark"><span>{"A"}</span></div>
                    <span class="brand-name">{"AIVisaPro"}</span>
                </div>
                <div class="nav-actions">
                    {
                        match &props.identity {
                            Some(identity) => {
                                let on_sign_out = props.on_sign_out.clone();
                                html! {
                                    <>
                                        <span class="nav-email">{ identity.email.clone() }</span>
                                        <Button
                                            variant={ButtonVariant::Outline}
                                            size={ButtonSize::Sm}
                                            onclick={Callback::from(move |_| on_sign_out.emit(()))}
                                        >
                                            {"Sign Out"}
                                        </Button>
                                    </>
                                }
                            }
                            None => html! {
                                <>
                                    <button class="nav-link" onclick={open(AuthMode::Login)}>
                                        {"Sign In"}
                                    </button>
                                    <Button size={ButtonSize::Sm} onclick={open(AuthMode::Signup)}>
                                        {"Get Started"}
                                    </Button>
                                </>
                            },
                        }
                    }
                </div>
            </nav>
        </header>
    }
}

fn check_icon() -> Html {
    html! {
        <div class="badge-check">
            <svg viewBox="0 0 20 20" fill="currentColor">
                <path
                    fill-rule="evenodd"
                    clip-rule="evenodd"
                    d="M16.707 5.293a1 1 0 010 1.414l-8 8a1 1 0 01-1.414 0l-4-4a1 1 0 011.414-1.414L8 12.586l7.293-7.293a1 1 0 011.414 0z"
                />
            </svg>
        </div>
    }
}

#[function_component(Landing)]
pub fn landing() -> Html {
    let flow = use_reducer(AuthFlow::default);
    let session = use_session();
    let config = use_context::<AppConfig>().unwrap_or_default();

    // Scroll to top only on initial mount
    use_effect_with_deps(
        move |_| {
            if let Some(window) = web_sys::window() {
                window.scroll_to_with_x_and_y(0.0, 0.0);
            }
            || ()
        },
        (),
    );

    let identity = session.as_ref().and_then(|s| s.identity.clone());

    let on_open = {
        let flow = flow.clone();
        Callback::from(move |mode: AuthMode| flow.dispatch(FlowAction::Open(mode)))
    };
    let open = |mode: AuthMode| {
        let on_open = on_open.clone();
        Callback::from(move |_: MouseEvent| on_open.emit(mode))
    };

    let on_sign_out = {
        let auth = session.as_ref().map(|s| s.auth.clone());
        Callback::from(move |_: ()| {
            let Some(auth) = auth.clone() else {
                log::error!("Sign out requested without a session provider");
                return;
            };
            spawn_local(async move {
                match auth.provider().sign_out().await {
                    Ok(()) => log::info!("Signed out"),
                    Err(err) => log::error!("Sign out failed: {}", err),
                }
            });
        })
    };

    html! {
        <div class="page">
            <style>{ LANDING_CSS }</style>
            <SiteHeader identity={identity} on_open={on_open.clone()} on_sign_out={on_sign_out} />

            <section class="container hero">
                <div class="hero-inner">
                    <div class="hero-pill">
                        <span>{"Trusted by 100,000+ global travelers"}</span>
                    </div>
                    <h1 class="hero-title">
                        {"Streamline Your Global Travel"}
                        <span class="hero-title-accent">{"with AI-Powered Visa Processing"}</span>
                    </h1>
                    <p class="hero-lead">
                        {"Navigate complex international visa requirements with confidence. \
                          Our intelligent platform transforms document-heavy processes into \
                          seamless, guided digital workflows."}
                    </p>
                    <div class="cta-row">
                        <Button size={ButtonSize::Lg} onclick={open(AuthMode::Signup)}>
                            {"Start Application"}
                        </Button>
                        <Button variant={ButtonVariant::Outline} size={ButtonSize::Lg}>
                            {"View Supported Countries"}
                        </Button>
                    </div>
                    <div class="badges">
                        { for TRUST_BADGES.iter().map(|badge| html! {
                            <div class="badge">
                                { check_icon() }
                                <span>{ *badge }</span>
                            </div>
                        }) }
                    </div>
                </div>
            </section>

            <section class="container features">
                <div class="section-heading">
                    <h2>{"Enterprise-Grade Visa Processing"}</h2>
                    <p>
                        {"Sophisticated automation meets intuitive design. \
                          Experience the future of international travel preparation."}
                    </p>
                </div>
                <div class="feature-grid">
                    { for FEATURES.iter().map(|(title, description, accent)| html! {
                        <FeatureCard title={*title} description={*description} accent={*accent} />
                    }) }
                </div>
            </section>

            <section class="stats">
                <div class="container stat-grid">
                    { for STATS.iter().map(|(number, label)| html! {
                        <StatCard number={*number} label={*label} />
                    }) }
                </div>
            </section>

            <section class="container cta">
                <Card class="cta-card">
                    <h2>{"Ready to Simplify Your International Travel?"}</h2>
                    <p>
                        {"Join thousands of professionals, students, and travelers who trust \
                          AIVisaPro for their visa processing needs."}
                    </p>
                    <div class="cta-row">
                        <Button size={ButtonSize::Lg} onclick={open(AuthMode::Signup)}>
                            {"Create Free Account"}
                        </Button>
                        <Button variant={ButtonVariant::Outline} size={ButtonSize::Lg}>
                            {"Schedule Demo"}
                        </Button>
                    </div>
                </Card>
            </section>

            <footer class="site-footer">
                <div class="container">
                    <div class="footer-grid">
                        <div>
                            <div class="brand">
                                <div class="brand-mark brand-mark-sm"><span>{"A"}</span></div>
                                <span class="brand-name brand-name-sm">{"AIVisaPro"}</span>
                            </div>
                            <p class="footer-tagline">
                                {"Simplifying global travel with AI-powered visa automation."}
                            </p>
                        </div>
                        { for FOOTER_COLUMNS.iter().map(|(heading, links)| html! {
                            <div>
                                <h3 class="footer-heading">{ *heading }</h3>
                                <ul class="footer-links">
                                    { for links.iter().map(|link| html! {
                                        <li><a href="#">{ *link }</a></li>
                                    }) }
                                </ul>
                            </div>
                        }) }
                    </div>
                    <div class="footer-bottom">
                        <p>{"© 2025 AIVisaPro. All rights reserved."}</p>
                    </div>
                </div>
            </footer>

            <AuthModal flow={flow} reload_delay_ms={config.login_reload_delay_ms} />
        </div>
    }
}

const LANDING_CSS: &str = r#"
.page {
    min-height: 100vh;
    background: linear-gradient(135deg, #f9fafb 0%, rgba(239, 246, 255, 0.6) 50%, rgba(240, 253, 250, 0.4) 100%);
    color: #111827;
    font-family: Inter, system-ui, -apple-system, sans-serif;
}
.container { max-width: 1200px; margin: 0 auto; padding: 0 1.5rem; }

.site-header {
    position: sticky;
    top: 0;
    z-index: 40;
    background: rgba(255, 255, 255, 0.8);
    backdrop-filter: blur(12px);
    border-bottom: 1px solid #e5e7eb;
    transition: box-shadow 0.2s;
}
.site-header.scrolled { box-shadow: 0 4px 16px rgba(17, 24, 39, 0.06); }
.nav { display: flex; justify-content: space-between; align-items: center; padding-top: 1rem; padding-bottom: 1rem; }
.brand { display: flex; align-items: center; gap: 0.5rem; }
.brand-mark {
    width: 2.5rem; height: 2.5rem; border-radius: 0.5rem;
    background: linear-gradient(135deg, #2563eb, #1d4ed8);
    display: flex; align-items: center; justify-content: center;
    color: white; font-weight: 700; font-size: 1.25rem;
}
.brand-mark-sm { width: 2rem; height: 2rem; font-size: 1rem; }
.brand-name { font-size: 1.5rem; font-weight: 700; }
.brand-name-sm { font-size: 1.25rem; }
.nav-actions { display: flex; align-items: center; gap: 1rem; }
.nav-email { font-size: 0.875rem; color: #4b5563; }
.nav-link { background: none; border: none; color: #374151; font-weight: 500; cursor: pointer; }
.nav-link:hover { color: #2563eb; }
@media (max-width: 768px) { .nav-email { display: none; } }

.btn { font-weight: 600; border-radius: 0.5rem; cursor: pointer; transition: all 0.2s; border: 2px solid transparent; }
.btn:disabled { opacity: 0.6; cursor: not-allowed; }
.btn-primary { background: #2563eb; color: white; }
.btn-primary:hover:not(:disabled) { background: #1d4ed8; box-shadow: 0 4px 12px rgba(37, 99, 235, 0.25); }
.btn-secondary { background: #14b8a6; color: white; }
.btn-secondary:hover:not(:disabled) { background: #0d9488; }
.btn-outline { background: transparent; border-color: #2563eb; color: #1d4ed8; }
.btn-outline:hover:not(:disabled) { background: #eff6ff; }
.btn-sm { padding: 0.5rem 1rem; font-size: 0.875rem; }
.btn-md { padding: 0.75rem 1.5rem; font-size: 1rem; }
.btn-lg { padding: 1rem 2rem; font-size: 1.125rem; }
.btn-block { width: 100%; }

.card { background: white; border-radius: 0.75rem; padding: 2rem; border: 1px solid #f3f4f6; box-shadow: 0 2px 15px rgba(0, 0, 0, 0.05); }
.card-hover { transition: box-shadow 0.3s; }
.card-hover:hover { box-shadow: 0 10px 40px rgba(0, 0, 0, 0.08); }

.hero { padding-top: 5rem; padding-bottom: 5rem; text-align: center; }
.hero-inner { max-width: 56rem; margin: 0 auto; }
.hero-pill {
    display: inline-flex; padding: 0.5rem 1rem; margin-bottom: 2rem;
    background: #f0fdfa; border: 1px solid #99f6e4; border-radius: 9999px;
    font-size: 0.875rem; font-weight: 500; color: #0f766e;
}
.hero-title { font-size: 3.25rem; font-weight: 700; line-height: 1.15; margin-bottom: 1.5rem; }
.hero-title-accent {
    display: block;
    background: linear-gradient(90deg, #2563eb, #14b8a6);
    -webkit-background-clip: text;
    -webkit-text-fill-color: transparent;
}
.hero-lead { font-size: 1.25rem; color: #4b5563; line-height: 1.7; max-width: 48rem; margin: 0 auto 2.5rem; }
.cta-row { display: flex; flex-wrap: wrap; gap: 1rem; justify-content: center; }
.badges { margin-top: 3rem; display: flex; justify-content: center; gap: 2rem; font-size: 0.875rem; color: #4b5563; flex-wrap: wrap; }
.badge { display: flex; align-items: center; gap: 0.5rem; }
.badge-check { width: 1.25rem; height: 1.25rem; border-radius: 9999px; background: #dbeafe; color: #2563eb; display: flex; align-items: center; justify-content: center; }
.badge-check svg { width: 0.75rem; height: 0.75rem; }

.features { padding-top: 5rem; padding-bottom: 5rem; }
.section-heading { text-align: center; margin-bottom: 4rem; }
.section-heading h2 { font-size: 2.25rem; font-weight: 700; margin-bottom: 1rem; }
.section-heading p { font-size: 1.125rem; color: #4b5563; max-width: 42rem; margin: 0 auto; }
.feature-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 2rem; }
.feature-icon { width: 3rem; height: 3rem; border-radius: 0.5rem; margin-bottom: 1rem; display: flex; align-items: center; justify-content: center; }
.feature-icon-primary { background: linear-gradient(135deg, #3b82f6, #2563eb); }
.feature-icon-accent { background: linear-gradient(135deg, #14b8a6, #0d9488); }
.feature-icon-inner { width: 1.5rem; height: 1.5rem; border: 2px solid white; border-radius: 0.25rem; }
.feature-title { font-size: 1.25rem; font-weight: 700; margin-bottom: 0.75rem; }
.feature-description { color: #4b5563; line-height: 1.6; }

.stats { background: linear-gradient(135deg, #2563eb, #1d4ed8); padding: 5rem 0; color: white; }
.stat-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 2rem; text-align: center; }
.stat-number { font-size: 3rem; font-weight: 700; margin-bottom: 0.5rem; }
.stat-label { color: #dbeafe; font-size: 0.875rem; }

.cta { padding-top: 5rem; padding-bottom: 5rem; }
.cta-card { max-width: 56rem; margin: 0 auto; text-align: center; }
.cta-card h2 { font-size: 2.25rem; font-weight: 700; margin-bottom: 1rem; }
.cta-card p { font-size: 1.125rem; color: #4b5563; margin-bottom: 2rem; }

.site-footer { border-top: 1px solid #e5e7eb; background: white; padding: 3rem 0; }
.footer-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 2rem; }
.footer-tagline { color: #4b5563; font-size: 0.875rem; margin-top: 1rem; }
.footer-heading { font-weight: 600; margin-bottom: 0.75rem; }
.footer-links { list-style: none; padding: 0; font-size: 0.875rem; }
.footer-links li { margin-bottom: 0.5rem; }
.footer-links a { color: #4b5563; text-decoration: none; }
.footer-links a:hover { color: #2563eb; }
.footer-bottom { border-top: 1px solid #e5e7eb; margin-top: 2rem; padding-top: 2rem; text-align: center; font-size: 0.875rem; color: #4b5563; }

.modal-backdrop {
    position: fixed; inset: 0; z-index: 50; padding: 1rem;
    background: rgba(17, 24, 39, 0.5); backdrop-filter: blur(4px);
    display: flex; align-items: center; justify-content: center;
}
.modal { background: white; border-radius: 1rem; max-width: 28rem; width: 100%; padding: 2rem; box-shadow: 0 25px 50px rgba(0, 0, 0, 0.25); }
.modal-header { display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 1.5rem; }
.modal-header h2 { font-size: 1.5rem; font-weight: 700; margin-bottom: 0.25rem; }
.modal-header p { color: #4b5563; }
.modal-close { background: none; border: none; font-size: 1.25rem; color: #9ca3af; cursor: pointer; }
.modal-close:hover { color: #4b5563; }
.modal-form { display: flex; flex-direction: column; gap: 1.25rem; }
.modal-footer { margin-top: 1.5rem; text-align: center; }
.link-button { background: none; border: none; color: #2563eb; font-size: 0.875rem; font-weight: 500; cursor: pointer; }
.link-button:hover:not(:disabled) { color: #1d4ed8; }
.notice { padding: 0.75rem 1rem; border-radius: 0.5rem; margin-bottom: 1.5rem; font-size: 0.875rem; }
.notice-error { background: #fef2f2; border: 1px solid #fecaca; color: #b91c1c; }
.notice-success { background: #f0fdf4; border: 1px solid #bbf7d0; color: #15803d; }

.field { display: flex; flex-direction: column; gap: 0.5rem; }
.field-label { font-size: 0.875rem; font-weight: 500; color: #374151; }
.field-input { padding: 0.75rem 1rem; border: 1px solid #d1d5db; border-radius: 0.5rem; font-size: 1rem; }
.field-input:focus { outline: none; border-color: #2563eb; box-shadow: 0 0 0 3px rgba(37, 99, 235, 0.15); }
.field-input:disabled { background: #f9fafb; }

@media (max-width: 768px) {
    .hero-title { font-size: 2.5rem; }
    .section-heading h2, .cta-card h2 { font-size: 1.875rem; }
}
"#;
