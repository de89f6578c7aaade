//! The application's top-level route table.
//!
//! Both the navbar and the main content area switch over the matched path, so
//! every top-level page is declared here in precedence order.

use futures_util::future::{self, BoxFuture, FutureExt};
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::routing::context::RequestContext;
use crate::routing::route::{
    LazyPage, LoadResult, PageComponent, PageDescriptor, RouteEntry, RouteRender, StaticPage,
};
use crate::routing::table::{RouteTable, RouteTableError};

/// Well-known page paths.
pub struct PageRoutes;

impl PageRoutes {
    pub const INDEX: &'static str = "/";
    pub const SEARCH: &'static str = "/search";
    pub const SEARCH_CONSOLE: &'static str = "/search/console";
    pub const SIGN_IN: &'static str = "/sign-in";
    pub const SIGN_UP: &'static str = "/sign-up";
    pub const UNLOCK_ACCOUNT: &'static str = "/unlock-account/:token";
    pub const WELCOME: &'static str = "/welcome";
    pub const INSTALL_GITHUB_APP_SUCCESS: &'static str = "/install-github-app-success";
    pub const SETTINGS: &'static str = "/settings";
    pub const USER: &'static str = "/user";
    pub const ORGANIZATIONS: &'static str = "/organizations";
    pub const SITE_ADMIN_INIT: &'static str = "/site-admin/init";
    pub const SITE_ADMIN: &'static str = "/site-admin";
    pub const PASSWORD_RESET: &'static str = "/password-reset";
    pub const API_CONSOLE: &'static str = "/api/console";
    pub const USER_AREA: &'static str = "/users/:username";
    pub const SURVEY: &'static str = "/survey";
    pub const HELP: &'static str = "/help";
    pub const DEBUG: &'static str = "/-/debug";
    pub const REPO_CONTAINER: &'static str = "/:repoRevAndRest+";
}

/// Community search context pages served on sourcegraph.com: (path, context spec).
pub const COMMUNITY_SEARCH_CONTEXTS: &[(&str, &str)] = &[
    ("/backstage", "@backstage"),
    ("/chakraui", "@chakraui"),
    ("/cncf", "@cncf"),
    ("/julia", "@julia"),
    ("/kubernetes", "@kubernetes"),
    ("/o3de", "@o3de"),
    ("/stackstorm", "@stackstorm"),
    ("/stanford", "@stanford"),
    ("/temporal", "@temporal"),
];

/// Source of page implementations for lazy routes.
pub trait ModuleLoader: Send + Sync {
    fn load(&self, component: &str) -> BoxFuture<'static, LoadResult>;
}

/// Loader for pages compiled into the binary; resolves immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledModules;

impl ModuleLoader for BundledModules {
    fn load(&self, component: &str) -> BoxFuture<'static, LoadResult> {
        let page: Arc<dyn PageComponent> = Arc::new(StaticPage::new(component));
        future::ready(Ok(page)).boxed()
    }
}

fn lazy(modules: &Arc<dyn ModuleLoader>, component: &'static str) -> LazyPage {
    let modules = Arc::clone(modules);
    LazyPage::new(component, move || modules.load(component))
}

/// A loaded page that also receives the server-provided site context.
#[derive(Debug)]
struct SiteContextPage {
    inner: Arc<dyn PageComponent>,
}

impl PageComponent for SiteContextPage {
    fn render(&self, ctx: &RequestContext) -> PageDescriptor {
        self.inner
            .render(ctx)
            .with_prop("sourcegraph_url", ctx.site().sourcegraph_url.clone())
    }
}

fn lazy_with_site_context(modules: &Arc<dyn ModuleLoader>, component: &'static str) -> LazyPage {
    let modules = Arc::clone(modules);
    LazyPage::new(component, move || {
        modules.load(component).map(|loaded| {
            loaded.map(|inner| Arc::new(SiteContextPage { inner }) as Arc<dyn PageComponent>)
        })
    })
}

/// Route group for community search context pages. Contributes nothing off sourcegraph.com.
pub fn community_search_context_routes(site: &SiteConfig) -> Vec<Option<RouteEntry>> {
    COMMUNITY_SEARCH_CONTEXTS
        .iter()
        .map(|&(path, spec)| {
            site.is_sourcegraph_dot_com.then(|| {
                RouteEntry::page(path, move |_| {
                    PageDescriptor::new("CommunitySearchContextPage").with_prop("spec", spec)
                })
                .exact()
            })
        })
        .collect()
}

/// Build the top-level route table.
pub fn app_routes(
    site: &SiteConfig,
    modules: Arc<dyn ModuleLoader>,
) -> Result<RouteTable, RouteTableError> {
    let console = lazy(&modules, "SearchConsolePage");

    RouteTable::builder()
        .route(RouteEntry::redirect(PageRoutes::INDEX, PageRoutes::SEARCH).exact())
        .route(RouteEntry::page(PageRoutes::SEARCH, |_| PageDescriptor::new("SearchPageWrapper")).exact())
        .route(
            RouteEntry::dynamic(PageRoutes::SEARCH_CONSOLE, move |ctx| {
                if ctx.features().show_multiline_search_console {
                    RouteRender::Lazy(console.clone())
                } else {
                    RouteRender::Redirect(PageRoutes::SEARCH.to_string())
                }
            })
            .exact(),
        )
        .route(
            RouteEntry::lazy(PageRoutes::SIGN_IN, lazy_with_site_context(&modules, "SignInPage"))
                .exact(),
        )
        .route(
            RouteEntry::lazy(PageRoutes::SIGN_UP, lazy_with_site_context(&modules, "SignUpPage"))
                .exact(),
        )
        .route(
            RouteEntry::lazy(
                PageRoutes::UNLOCK_ACCOUNT,
                lazy_with_site_context(&modules, "UnlockAccountPage"),
            )
            .exact(),
        )
        // Kept so existing links keep working.
        .route(RouteEntry::redirect(PageRoutes::WELCOME, PageRoutes::SEARCH).exact())
        .route(RouteEntry::lazy(
            PageRoutes::INSTALL_GITHUB_APP_SUCCESS,
            lazy(&modules, "InstallGitHubAppSuccessPage"),
        ))
        .route(RouteEntry::lazy(PageRoutes::SETTINGS, lazy(&modules, "RedirectToUserSettings")))
        .route(RouteEntry::lazy(PageRoutes::USER, lazy(&modules, "RedirectToUserPage")))
        .route(RouteEntry::lazy(PageRoutes::ORGANIZATIONS, lazy(&modules, "OrgsArea")))
        .route(
            RouteEntry::lazy(
                PageRoutes::SITE_ADMIN_INIT,
                lazy_with_site_context(&modules, "SiteInitPage"),
            )
            .exact(),
        )
        .route(RouteEntry::lazy(PageRoutes::SITE_ADMIN, lazy(&modules, "SiteAdminArea")))
        .route(
            RouteEntry::lazy(PageRoutes::PASSWORD_RESET, lazy(&modules, "ResetPasswordPage"))
                .exact(),
        )
        .route(RouteEntry::lazy(PageRoutes::API_CONSOLE, lazy(&modules, "ApiConsole")).exact())
        .route(RouteEntry::lazy(PageRoutes::USER_AREA, lazy(&modules, "UserArea")))
        .route(RouteEntry::lazy(PageRoutes::SURVEY, lazy(&modules, "SurveyPage")))
        .route(RouteEntry::pass_through(PageRoutes::HELP))
        .route(RouteEntry::pass_through(PageRoutes::DEBUG))
        .group(community_search_context_routes(site))
        .route(RouteEntry::lazy(PageRoutes::REPO_CONTAINER, lazy(&modules, "RepoContainer")))
        .build()
}
