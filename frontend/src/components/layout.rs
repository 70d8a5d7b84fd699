use leptos::*;

use crate::state::session::{use_logout, use_session};

/// Display label for a section prefix such as `/add-section-officer`.
pub fn section_label(prefix: &str) -> String {
    let words: Vec<String> = prefix
        .trim_matches('/')
        .split(['/', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| match word {
            "er" => "ER".to_string(),
            _ => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect();
    if words.is_empty() {
        "Home".to_string()
    } else {
        words.join(" ")
    }
}

#[component]
pub fn Header() -> impl IntoView {
    let session = use_session();
    let sections = session
        .as_ref()
        .map(|ctx| ctx.allowed_sections())
        .unwrap_or_default();
    let signed_in = session
        .as_ref()
        .map(|ctx| ctx.is_signed_in())
        .unwrap_or(false);
    let logout = use_logout();
    view! {
        <header class="bg-surface-elevated shadow-sm border-b border-border">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <h1 class="text-xl font-semibold text-fg">"AIS Portal"</h1>
                    <nav class="flex space-x-4">
                        {sections
                            .into_iter()
                            .map(|prefix| {
                                let label = section_label(&prefix);
                                view! {
                                    <a href=prefix class="text-fg-muted hover:text-fg px-3 py-2 rounded-md text-sm font-medium">
                                        {label}
                                    </a>
                                }
                            })
                            .collect_view()}
                        <Show when=move || signed_in>
                            <button
                                on:click={
                                    let logout = logout.clone();
                                    move |_| logout()
                                }
                                class="text-fg-muted hover:text-fg px-3 py-2 rounded-md text-sm font-medium"
                            >
                                "Sign out"
                            </button>
                        </Show>
                    </nav>
                </div>
            </div>
        </header>
    }
}

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-surface">
            <Header/>
            <main class="max-w-7xl mx-auto py-6 sm:px-6 lg:px-8">{children()}</main>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::section_label;

    #[test]
    fn section_labels_are_title_cased() {
        assert_eq!(section_label("/add-section-officer"), "Add Section Officer");
        assert_eq!(section_label("/add/officer"), "Add Officer");
        assert_eq!(section_label("/er-profile"), "ER Profile");
        assert_eq!(section_label("/"), "Home");
    }
}
