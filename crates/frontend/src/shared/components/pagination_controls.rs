use crate::shared::components::data_grid::GridHandle;
use crate::shared::icons::icon;
use contracts::shared::grid::{PageButton, PageRequest};
use leptos::prelude::*;

/// PaginationControls component - пагинация таблицы
///
/// Renders the page-button window of `PaginationState` (with ellipses),
/// first/prev/next/last buttons, the row range label and the page-size
/// selector. Nothing is rendered while the grid has no pages.
#[component]
pub fn PaginationControls(grid: GridHandle) -> impl IntoView {
    let view_state = grid.view();
    let pagination = move || view_state.with(|v| v.pagination.clone());
    let enabled = view_state.with_untracked(|v| v.features.pagination);

    let nav_button = move |request: PageRequest, icon_name: &'static str, title: &'static str| {
        let disabled = move || {
            pagination()
                .map(|p| p.navigate(request).is_none())
                .unwrap_or(true)
        };
        view! {
            <button
                class="pagination-btn"
                on:click=move |_| grid.go_to(request)
                disabled=disabled
                title=title
            >
                {icon(icon_name)}
            </button>
        }
    };

    view! {
        <Show when=move || enabled>
            <div class="pagination-controls">
                {nav_button(PageRequest::First, "chevrons-left", "Первая страница")}
                {nav_button(PageRequest::Previous, "chevron-left", "Предыдущая страница")}
                <span class="pagination-pages">
                    {move || {
                        let Some(state) = pagination() else {
                            return Vec::new();
                        };
                        state
                            .page_buttons
                            .iter()
                            .map(|button| match *button {
                                PageButton::Page(page) => {
                                    let current = page == state.current_page;
                                    view! {
                                        <button
                                            class="pagination-btn pagination-page"
                                            class:pagination-page--current=current
                                            on:click=move |_| grid.go_to(PageRequest::Page(page))
                                        >
                                            {(page + 1).to_string()}
                                        </button>
                                    }
                                    .into_any()
                                }
                                PageButton::Ellipsis => {
                                    view! { <span class="pagination-ellipsis">"…"</span> }.into_any()
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </span>
                {nav_button(PageRequest::Next, "chevron-right", "Следующая страница")}
                {nav_button(PageRequest::Last, "chevrons-right", "Последняя страница")}
                <span class="pagination-info">
                    {move || pagination().map(|p| p.range_label()).unwrap_or_default()}
                </span>
                <select
                    class="page-size-select"
                    on:change=move |ev| {
                        if let Ok(size) = event_target_value(&ev).parse::<usize>() {
                            grid.set_page_size(size);
                        }
                    }
                    prop:value=move || view_state.with(|v| v.page_size.to_string())
                >
                    {move || {
                        let (options, current) =
                            view_state.with(|v| (v.page_size_options.clone(), v.page_size));
                        options
                            .into_iter()
                            .map(|size| {
                                view! {
                                    <option value=size.to_string() selected=size == current>
                                        {size.to_string()}
                                    </option>
                                }
                            })
                            .collect_view()
                    }}
                </select>
            </div>
        </Show>
    }
}
