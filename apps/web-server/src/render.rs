//! Server-side HTML rendering.
//!
//! Pages are pure functions of their inputs: the same view models always
//! produce byte-identical markup. The cached index page depends on that,
//! since a cache hit replays the stored bytes verbatim.

use lenta_core::domain::Group;
use lenta_core::pagination::Page;
use lenta_core::validation::FieldError;
use lenta_shared::{CommentView, PostCard, PostForm};

/// HTML-escape untrusted text.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"ru\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} | Lenta</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">Lenta</a> <a href=\"/follow/\">Избранные авторы</a> \
         <a href=\"/create/\">Новая запись</a> <a href=\"/about/author/\">Об авторе</a> \
         <a href=\"/about/tech/\">Технологии</a></nav>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn post_card_html(post: &PostCard) -> String {
    let mut card = format!(
        "<article class=\"post\" id=\"post-{}\">\n\
         <p class=\"post-meta\"><a href=\"/profile/{}/\">{}</a> · {}</p>\n",
        post.id,
        escape(&post.author),
        escape(&post.author),
        escape(&post.pub_date)
    );
    if let Some(group) = &post.group {
        card.push_str(&format!(
            "<p class=\"post-group\">{}</p>\n",
            escape(group)
        ));
    }
    if let Some(image) = &post.image {
        card.push_str(&format!(
            "<img src=\"/media/{}\" alt=\"\">\n",
            escape(image)
        ));
    }
    card.push_str(&format!(
        "<p class=\"post-text\">{}</p>\n\
         <a href=\"/posts/{}/\">Подробнее</a>\n</article>\n",
        escape(&post.text),
        post.id
    ));
    card
}

fn pagination_nav(page: &Page<PostCard>, base_path: &str) -> String {
    let mut nav = String::from("<nav class=\"pagination\">\n");
    if page.has_previous() {
        nav.push_str(&format!(
            "<a href=\"{}?page={}\">Назад</a>\n",
            base_path,
            page.number - 1
        ));
    }
    nav.push_str(&format!(
        "<span>Страница {} из {}</span>\n",
        page.number, page.total_pages
    ));
    if page.has_next() {
        nav.push_str(&format!(
            "<a href=\"{}?page={}\">Вперёд</a>\n",
            base_path,
            page.number + 1
        ));
    }
    nav.push_str("</nav>\n");
    nav
}

fn feed(page: &Page<PostCard>, base_path: &str) -> String {
    let mut body = String::new();
    for post in &page.items {
        body.push_str(&post_card_html(post));
    }
    if page.items.is_empty() {
        body.push_str("<p class=\"empty\">Записей пока нет.</p>\n");
    }
    body.push_str(&pagination_nav(page, base_path));
    body
}

/// The public index feed.
pub fn index_page(page: &Page<PostCard>) -> String {
    let mut body = String::from("<h1>Последние обновления на сайте</h1>\n");
    body.push_str(&feed(page, "/"));
    layout("Последние обновления", &body)
}

/// A single group's feed.
pub fn group_page(group: &Group, page: &Page<PostCard>) -> String {
    let mut body = format!(
        "<h1>Записи сообщества {}</h1>\n<p class=\"group-description\">{}</p>\n",
        escape(&group.title),
        escape(&group.description)
    );
    body.push_str(&feed(page, &format!("/group/{}/", group.slug)));
    layout(&format!("Сообщество {}", group.title), &body)
}

/// An author's profile with their posts.
pub fn profile_page(
    username: &str,
    post_count: usize,
    page: &Page<PostCard>,
    follow_state: Option<bool>,
) -> String {
    let mut body = format!(
        "<h1>Профайл пользователя {}</h1>\n\
         <p class=\"post-count\">Всего записей: {}</p>\n",
        escape(username),
        post_count
    );
    match follow_state {
        Some(true) => body.push_str(&format!(
            "<form action=\"/profile/{}/unfollow/\" method=\"post\">\
             <button type=\"submit\">Отписаться</button></form>\n",
            escape(username)
        )),
        Some(false) => body.push_str(&format!(
            "<form action=\"/profile/{}/follow/\" method=\"post\">\
             <button type=\"submit\">Подписаться</button></form>\n",
            escape(username)
        )),
        None => {}
    }
    body.push_str(&feed(page, &format!("/profile/{}/", username)));
    layout(&format!("Профайл {username}"), &body)
}

fn comment_html(comment: &CommentView) -> String {
    format!(
        "<div class=\"comment\">\n<p class=\"comment-meta\">{} · {}</p>\n\
         <p class=\"comment-text\">{}</p>\n</div>\n",
        escape(&comment.author),
        escape(&comment.created),
        escape(&comment.text)
    )
}

/// A single post with its comments and the comment form.
pub fn post_detail_page(
    post: &PostCard,
    comments: &[CommentView],
    viewer_can_edit: bool,
    viewer_can_comment: bool,
) -> String {
    let mut body = post_card_html(post);
    if viewer_can_edit {
        body.push_str(&format!(
            "<a class=\"edit-link\" href=\"/posts/{}/edit/\">Редактировать</a>\n",
            post.id
        ));
    }
    body.push_str(&format!("<h2>Комментарии ({})</h2>\n", comments.len()));
    for comment in comments {
        body.push_str(&comment_html(comment));
    }
    if viewer_can_comment {
        body.push_str(&format!(
            "<form action=\"/posts/{}/comment/\" method=\"post\">\n\
             <textarea name=\"text\"></textarea>\n\
             <button type=\"submit\">Добавить комментарий</button>\n</form>\n",
            post.id
        ));
    } else {
        body.push_str(&format!(
            "<p><a href=\"/auth/login/?next=/posts/{}/\">Войдите</a>, чтобы комментировать.</p>\n",
            post.id
        ));
    }
    layout("Пост", &body)
}

fn field_errors_html(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut list = String::from("<ul class=\"form-errors\">\n");
    for err in errors {
        list.push_str(&format!(
            "<li data-field=\"{}\">{}</li>\n",
            err.field,
            escape(&err.message)
        ));
    }
    list.push_str("</ul>\n");
    list
}

/// The create/edit post form. On validation failure the prior input is
/// preserved so the author does not lose their draft.
pub fn post_form_page(
    editing: Option<i64>,
    form: &PostForm,
    groups: &[Group],
    errors: &[FieldError],
) -> String {
    let (title, action) = match editing {
        Some(id) => ("Редактировать запись", format!("/posts/{id}/edit/")),
        None => ("Новая запись", "/create/".to_string()),
    };

    let mut options = String::from("<option value=\"\">---</option>\n");
    for group in groups {
        let selected = if form.group == group.id.to_string() {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            group.id,
            selected,
            escape(&group.title)
        ));
    }

    let body = format!(
        "<h1>{}</h1>\n{}\
         <form action=\"{}\" method=\"post\">\n\
         <textarea name=\"text\">{}</textarea>\n\
         <select name=\"group\">\n{}</select>\n\
         <input type=\"file\" name=\"image\">\n\
         <button type=\"submit\">Сохранить</button>\n</form>\n",
        title,
        field_errors_html(errors),
        action,
        escape(&form.text),
        options
    );
    layout(title, &body)
}

/// The personalized feed of followed authors.
pub fn follow_page(page: &Page<PostCard>) -> String {
    let mut body = String::from("<h1>Обновления избранных авторов</h1>\n");
    body.push_str(&feed(page, "/follow/"));
    layout("Избранные авторы", &body)
}

/// The login form.
pub fn login_page(next: &str, error: Option<&str>) -> String {
    let mut body = String::from("<h1>Войти на сайт</h1>\n");
    if let Some(msg) = error {
        body.push_str(&format!("<p class=\"form-errors\">{}</p>\n", escape(msg)));
    }
    body.push_str(&format!(
        "<form action=\"/auth/login/\" method=\"post\">\n\
         <input type=\"text\" name=\"username\" placeholder=\"Имя пользователя\">\n\
         <input type=\"password\" name=\"password\" placeholder=\"Пароль\">\n\
         <input type=\"hidden\" name=\"next\" value=\"{}\">\n\
         <button type=\"submit\">Войти</button>\n</form>\n",
        escape(next)
    ));
    layout("Войти", &body)
}

/// Static page about the site's author.
pub fn about_author_page() -> String {
    layout(
        "Об авторе",
        "<h1>Об авторе проекта</h1>\n\
         <p>Привет! Этот проект написан для тех, кто любит делиться текстами.</p>\n",
    )
}

/// Static page about the stack.
pub fn about_tech_page() -> String {
    layout(
        "Технологии",
        "<h1>Технологии</h1>\n\
         <p>Сервер написан на Rust: actix-web, SeaORM и PostgreSQL.</p>\n",
    )
}

/// Custom not-found page, distinct from the built-in one.
pub fn not_found_page() -> String {
    layout(
        "Страница не найдена",
        "<h1>404: Кастомная страница не найдена</h1>\n\
         <p>Такой страницы нет. <a href=\"/\">Вернуться на главную</a>.</p>\n",
    )
}

/// Generic failure page for unexpected server errors.
pub fn server_error_page() -> String {
    layout(
        "Ошибка сервера",
        "<h1>500: Ошибка сервера</h1>\n<p>Попробуйте обновить страницу позже.</p>\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: i64) -> PostCard {
        PostCard {
            id,
            text: format!("post {id}"),
            author: "auth".to_string(),
            pub_date: "2026-01-01T00:00:00+00:00".to_string(),
            group: None,
            image: None,
        }
    }

    fn one_page(items: Vec<PostCard>) -> Page<PostCard> {
        let total_items = items.len();
        Page {
            items,
            number: 1,
            total_pages: 1,
            total_items,
        }
    }

    #[test]
    fn escape_covers_html_metacharacters() {
        assert_eq!(
            escape("<b>&\"'</b>"),
            "&lt;b&gt;&amp;&quot;&#x27;&lt;/b&gt;"
        );
        assert_eq!(escape("Тестовый текст"), "Тестовый текст");
    }

    #[test]
    fn index_rendering_is_deterministic() {
        let page = one_page(vec![card(1), card(2)]);
        assert_eq!(index_page(&page), index_page(&page));
    }

    #[test]
    fn post_text_is_escaped_in_cards() {
        let mut post = card(1);
        post.text = "<script>alert(1)</script>".to_string();
        let html = index_page(&one_page(vec![post]));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn profile_shows_follow_or_unfollow_button() {
        let page = one_page(vec![]);
        let following = profile_page("leo", 0, &page, Some(true));
        assert!(following.contains("/profile/leo/unfollow/"));
        let not_following = profile_page("leo", 0, &page, Some(false));
        assert!(not_following.contains("/profile/leo/follow/"));
        let own = profile_page("leo", 0, &page, None);
        assert!(!own.contains("/profile/leo/follow/"));
    }

    #[test]
    fn form_preserves_prior_input_and_errors() {
        let form = PostForm {
            text: "draft text".to_string(),
            group: String::new(),
            image: String::new(),
        };
        let errors = vec![FieldError::new("text", "Post text must not be empty")];
        let html = post_form_page(None, &form, &[], &errors);
        assert!(html.contains("draft text"));
        assert!(html.contains("Post text must not be empty"));
    }

    #[test]
    fn post_form_submits_urlencoded() {
        let form = PostForm {
            text: String::new(),
            group: String::new(),
            image: String::new(),
        };
        let html = post_form_page(None, &form, &[], &[]);
        assert!(html.contains("<form action=\"/create/\" method=\"post\">"));
        assert!(!html.contains("multipart"));
    }

    #[test]
    fn not_found_page_is_clearly_custom() {
        assert!(not_found_page().contains("Кастомная страница"));
    }
}
