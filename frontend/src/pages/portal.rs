use leptos::*;
use leptos_router::use_location;

use crate::{
    components::layout::{section_label, Layout},
    state::{
        profile::{provide_profile, use_profile},
        session::use_session,
    },
};

/// Landing view for every guarded section. The section's own screens are
/// mounted by their feature modules.
#[component]
pub fn PortalPage() -> impl IntoView {
    let location = use_location();
    let title = move || section_label(&location.pathname.get());
    let is_profile = move || location.pathname.get().starts_with("/er-profile");
    view! {
        <Layout>
            <h2 class="text-2xl font-bold text-fg">{title}</h2>
            <Show when=is_profile>
                <ProfileProgress/>
            </Show>
        </Layout>
    }
}

#[component]
pub fn ProfileProgress() -> impl IntoView {
    let profile = use_profile().or_else(|| {
        use_session().map(|session| provide_profile(session.guard().store()))
    });
    match profile {
        Some(ctx) => {
            let percent = ctx.completion_percent();
            view! {
                <div class="mt-4">
                    <p class="text-sm text-fg-muted">
                        "Profile completion: " {move || percent.get()} "%"
                    </p>
                    <div class="h-2 bg-border rounded">
                        <div
                            class="h-2 bg-action-primary-bg rounded"
                            style=move || format!("width: {}%", percent.get())
                        ></div>
                    </div>
                </div>
            }
            .into_view()
        }
        None => ().into_view(),
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::ProfileProgress;
    use crate::components::guard::SessionGuard;
    use crate::session::SessionStore;
    use crate::state::profile::PROFILE_KEY;
    use crate::test_support::helpers::{signed_in_store, FakeServices};
    use crate::test_support::ssr::render_with_services;
    use leptos::*;

    #[test]
    fn profile_progress_reads_cached_completion() {
        let store = signed_in_store("2", 0);
        store
            .set(
                PROFILE_KEY,
                r#"{"completion":{"completed":["personal","contact","service"]}}"#,
            )
            .unwrap();
        let fakes = FakeServices::new(store, "/er-profile", 10);
        let html = render_with_services(fakes.services(), || {
            view! {
                <SessionGuard path=Signal::derive(|| "/er-profile".to_string())>
                    {|| view! { <ProfileProgress/> }}
                </SessionGuard>
            }
        });
        assert!(html.contains("width: 50%"));
    }
}
