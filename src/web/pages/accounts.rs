//! Account connection management.

use maud::{html, Markup};

use crate::components::{BaseLayout, ConnectionBadge, Flash};
use crate::platforms::{ConnectionStatus, Platform, Tier};

#[must_use]
pub fn render_accounts_page(statuses: &[ConnectionStatus], flash: Option<&Flash>) -> Markup {
    let content = html! {
        h1 { "Connect Social Media Accounts" }
        p { "Connect your social media accounts to enable direct publishing." }

        @if let Some(flash) = flash {
            (flash)
        }

        article class="info" {
            strong { "Platform tiers: " }
            "Bluesky and LinkedIn post through their live APIs. "
            "Twitter/X and Threads run in demo mode."
        }

        @for status in statuses {
            (platform_card(status))
        }
    };

    BaseLayout::new("Accounts").active("/accounts").render(content)
}

fn platform_card(status: &ConnectionStatus) -> Markup {
    let platform = status.platform;
    let profile = platform.profile();
    let slug = platform.as_str();
    let tier = match profile.tier {
        Tier::Free => "Free",
        Tier::Premium => "Premium",
    };

    html! {
        section id=(slug) {
            h2 {
                (profile.name) " "
                (ConnectionBadge { connected: status.connected, demo: status.demo })
            }
            p {
                strong { "Tier: " } (tier)
                " | "
                strong { "Status: " } (profile.tier_status)
            }

            @if status.connected {
                @if let Some(account) = &status.account {
                    p {
                        "Connected as "
                        @if let Some(url) = &account.profile_url {
                            a href=(url) target="_blank" rel="noopener noreferrer" { (account.name) }
                        } @else {
                            (account.name)
                        }
                        @if let Some(handle) = &account.handle {
                            " (@" (handle) ")"
                        }
                    }
                }
                form method="post" action={ "/accounts/" (slug) "/disconnect" } {
                    button type="submit" class="secondary" { "Disconnect" }
                }
            } @else {
                (connect_form(platform))
            }
        }
    }
}

fn connect_form(platform: Platform) -> Markup {
    let action = format!("/accounts/{}/connect", platform.as_str());
    match platform {
        Platform::Bluesky => html! {
            form method="post" action=(action) {
                label for="bluesky-username" { "Bluesky email or handle" }
                input type="text" id="bluesky-username" name="username"
                    placeholder="you@example.com or username.bsky.social" required;
                label for="bluesky-password" { "App password" }
                input type="password" id="bluesky-password" name="password" required;
                button type="submit" { "Connect to Bluesky" }
            }
        },
        Platform::LinkedIn => html! {
            form method="post" action=(action) {
                label for="linkedin-token" { "Access token" }
                input type="password" id="linkedin-token" name="access_token";
                small { "Requires an app with the w_member_social permission." }
                button type="submit" { "Connect with token" }
            }
            form method="post" action=(action) {
                input type="hidden" name="demo" value="true";
                button type="submit" class="secondary" { "Use demo mode" }
            }
        },
        Platform::Twitter | Platform::Threads => html! {
            form method="post" action=(action) {
                input type="hidden" name="demo" value="true";
                button type="submit" { "Connect " (platform.name()) " (demo)" }
            }
        },
    }
}
