use crate::shared::components::data_grid::GridHandle;
use crate::shared::icons::icon;
use leptos::prelude::*;

/// Поле быстрого поиска по таблице.
///
/// Text goes to the grid on every keystroke; the grid applies it once typing
/// pauses for the debounce window. Clearing applies immediately.
#[component]
pub fn SearchInput(
    grid: GridHandle,
    #[prop(optional, into)] placeholder: MaybeProp<String>,
) -> impl IntoView {
    let view_state = grid.view();
    let text = move || view_state.with(|v| v.search_text.clone());
    let placeholder = move || placeholder.get().unwrap_or_else(|| "Поиск...".to_string());

    view! {
        <div class="search-input">
            <span class="search-input__icon">{icon("search")}</span>
            <input
                type="text"
                class="search-input__field"
                class:search-input__field--active=move || !text().trim().is_empty()
                placeholder=placeholder
                prop:value=text
                on:input=move |ev| grid.search(event_target_value(&ev))
            />
            <Show when=move || !text().is_empty()>
                <button
                    class="search-input__clear"
                    title="Очистить"
                    on:click=move |_| grid.search_clear()
                >
                    {icon("x")}
                </button>
            </Show>
        </div>
    }
}
