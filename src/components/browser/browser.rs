//! Main browser component.
//!
//! Renders the display model of the current folder and owns the window-level
//! keyboard shortcuts. Placeholder proximity is reported by the tiles
//! themselves, see [`AppContext::watch`].

use leptos::prelude::*;
use leptos_icons::Icon;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::Closure;

use super::{Card, Description, FolderTile};
use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/browser/browser.module.css");

#[component]
pub fn Browser() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    // Render the managed root once mounted
    Effect::new(move |_| ctx.spawn(ctx.nav().start()));

    #[cfg(target_arch = "wasm32")]
    install_listeners(ctx);

    let description = Memo::new(move |_| ctx.description().map(|block| block.id));

    view! {
        <div class=css::browser>
            <header class=css::header>
                <button
                    class=css::back
                    title="Back"
                    on:click=move |_| ctx.spawn(ctx.nav().navigate_back())
                >
                    <Icon icon=ic::BACK />
                </button>
                <h1 class=css::pathTitle>{move || ctx.title.get()}</h1>
            </header>

            {move || description.get().map(|id| view! { <Description id=id /> })}

            <section class=css::grid aria-label="Videos">
                <For
                    each=move || ctx.card_ids()
                    key=|id| *id
                    children=move |id| view! { <Card id=id /> }
                />
            </section>

            <section class=css::folders aria-label="Folders">
                <For
                    each=move || ctx.folder_ids()
                    key=|id| *id
                    children=move |id| view! { <FolderTile id=id /> }
                />
            </section>
        </div>
    }
}

/// Window listeners live as long as the page.
#[cfg(target_arch = "wasm32")]
fn install_listeners(ctx: AppContext) {
    use vidshelf_core::{Modifiers, key_action};
    use wasm_bindgen::JsCast;

    let Some(window) = web_sys::window() else {
        return;
    };

    let on_key = Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
        let modifiers = Modifiers {
            ctrl: event.ctrl_key(),
            meta: event.meta_key(),
            alt: event.alt_key(),
            shift: event.shift_key(),
        };
        let Some(action) = key_action(&event.key(), modifiers) else {
            return;
        };
        // Activation keys stay with buttons and page scrolling unless a
        // folder or card has focus
        let nav = ctx.nav();
        if nav.accepts(action) {
            event.prevent_default();
            ctx.spawn(nav.handle_key(action));
        }
    }) as Box<dyn Fn(web_sys::KeyboardEvent)>);
    let _ = window.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref());
    on_key.forget();
}
