use repdesk_shared::user::Role;

const ALL: &[Role] = &[Role::SuperAdmin, Role::Manager, Role::Rep];
const STAFF: &[Role] = &[Role::SuperAdmin, Role::Manager];
const SUPER_ADMIN: &[Role] = &[Role::SuperAdmin];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Assignments,
    Representatives,
    Doctors,
    Clinics,
    Products,
    Brands,
    Users,
}

impl Screen {
    /// NAV_ITEMS is declared in `Screen` order.
    pub fn item(&self) -> &'static NavItem {
        &NAV_ITEMS[*self as usize]
    }

    /// Route guard, backed by the same table the menu is built from.
    pub fn allows(&self, role: Role) -> bool {
        self.item().roles.contains(&role)
    }
}

#[derive(Debug)]
pub struct NavItem {
    pub screen: Screen,
    pub label: &'static str,
    pub path: &'static str,
    pub exact: bool,
    pub roles: &'static [Role],
}

pub static NAV_ITEMS: &[NavItem] = &[
    NavItem {
        screen: Screen::Dashboard,
        label: "Dashboard",
        path: "/",
        exact: true,
        roles: ALL,
    },
    NavItem {
        screen: Screen::Assignments,
        label: "Assignments",
        path: "/assignments",
        exact: false,
        roles: ALL,
    },
    NavItem {
        screen: Screen::Representatives,
        label: "Representatives",
        path: "/representatives",
        exact: false,
        roles: STAFF,
    },
    NavItem {
        screen: Screen::Doctors,
        label: "Doctors",
        path: "/doctors",
        exact: false,
        roles: STAFF,
    },
    NavItem {
        screen: Screen::Clinics,
        label: "Clinics",
        path: "/clinics",
        exact: false,
        roles: STAFF,
    },
    NavItem {
        screen: Screen::Products,
        label: "Products",
        path: "/products",
        exact: false,
        roles: STAFF,
    },
    NavItem {
        screen: Screen::Brands,
        label: "Brands",
        path: "/brands",
        exact: false,
        roles: SUPER_ADMIN,
    },
    NavItem {
        screen: Screen::Users,
        label: "Users",
        path: "/users",
        exact: false,
        roles: SUPER_ADMIN,
    },
];

/// Menu entries the role may see, in configuration order.
pub fn visible_items(role: Role) -> Vec<&'static NavItem> {
    NAV_ITEMS
        .iter()
        .filter(|item| item.roles.contains(&role))
        .collect()
}

/// Non-exact items match the path itself or anything below it, at a `/` boundary.
pub fn is_active(current_path: &str, item_path: &str, exact: bool) -> bool {
    if exact || current_path == item_path {
        return current_path == item_path;
    }

    let prefix = item_path.trim_end_matches('/');

    match current_path.strip_prefix(prefix) {
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

/// Rendered menu for one request.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub links: Vec<NavLink>,
    pub full_name: String,
    pub role_label: &'static str,
}

#[derive(Debug, Clone)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

impl Nav {
    pub fn new(account: &repdesk_user::Account, current_path: &str) -> Self {
        let links = visible_items(account.role)
            .into_iter()
            .map(|item| NavLink {
                label: item.label,
                path: item.path,
                active: is_active(current_path, item.path, item.exact),
            })
            .collect();

        Self {
            links,
            full_name: account.full_name.to_owned(),
            role_label: account.role.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screens(role: Role) -> Vec<Screen> {
        visible_items(role).into_iter().map(|i| i.screen).collect()
    }

    #[test]
    fn test_rep_sees_dashboard_and_assignments() {
        assert_eq!(
            screens(Role::Rep),
            vec![Screen::Dashboard, Screen::Assignments]
        );
    }

    #[test]
    fn test_manager_does_not_see_brands_or_users() {
        assert_eq!(
            screens(Role::Manager),
            vec![
                Screen::Dashboard,
                Screen::Assignments,
                Screen::Representatives,
                Screen::Doctors,
                Screen::Clinics,
                Screen::Products,
            ]
        );
    }

    #[test]
    fn test_super_admin_sees_everything_in_order() {
        let expected: Vec<Screen> = NAV_ITEMS.iter().map(|i| i.screen).collect();
        assert_eq!(screens(Role::SuperAdmin), expected);
    }

    #[test]
    fn test_allows_matches_visibility() {
        for role in [Role::SuperAdmin, Role::Manager, Role::Rep] {
            for item in NAV_ITEMS {
                assert_eq!(
                    item.screen.allows(role),
                    screens(role).contains(&item.screen)
                );
            }
        }
        assert!(!Screen::Doctors.allows(Role::Rep));
        assert!(Screen::Assignments.allows(Role::Rep));
    }

    #[test]
    fn test_items_follow_screen_order() {
        for (index, item) in NAV_ITEMS.iter().enumerate() {
            assert_eq!(item.screen as usize, index);
        }
    }

    #[test]
    fn test_exact_match() {
        assert!(is_active("/", "/", true));
        assert!(!is_active("/assignments", "/", true));
    }

    #[test]
    fn test_segment_boundary_match() {
        assert!(is_active("/doctors", "/doctors", false));
        assert!(is_active("/doctors/new", "/doctors", false));
        assert!(is_active("/doctors/1/edit", "/doctors", false));
        assert!(!is_active("/doctors", "/doctor", false));
        assert!(!is_active("/doctorsx", "/doctors", false));
        assert!(!is_active("/clinics", "/doctors", false));
    }

    #[test]
    fn test_no_item_shadows_another() {
        for a in NAV_ITEMS.iter().filter(|i| !i.exact) {
            for b in NAV_ITEMS.iter().filter(|i| !i.exact) {
                if a.path != b.path {
                    assert!(
                        !is_active(b.path, a.path, false),
                        "{} is active for {}",
                        a.path,
                        b.path
                    );
                }
            }
        }
    }

    #[test]
    fn test_nav_marks_the_current_screen() {
        let account = repdesk_user::Account {
            id: "1".to_owned(),
            email: "rep@repdesk.localhost".to_owned(),
            full_name: "Rep".to_owned(),
            role: Role::Rep,
            state: repdesk_shared::user::State::Active,
        };

        let nav = Nav::new(&account, "/assignments/new");
        let active: Vec<&str> = nav
            .links
            .iter()
            .filter(|l| l.active)
            .map(|l| l.label)
            .collect();

        assert_eq!(active, vec!["Assignments"]);
        assert_eq!(nav.role_label, "Representative");
    }
}
