use brickwork_core::{
    and, delete_from, gt, in_list, insert, is_null, like, op, or, select, select_all, update,
    Dialect, Fields, PlaceholderStyle,
};

fn main() -> brickwork_core::Result<()> {
    // SELECT with composed conditions
    let mut users = select(["id", "name", "email"]);
    users
        .from("users")
        .where_(("age", op::GT, 18))
        .where_(or([like("city", "%York%"), in_list("country", ["US", "CA"])?]))
        .order_by("name DESC")
        .limit(10)
        .offset(5);

    let built = users.build()?;
    println!("SELECT SQL: {}", built.text);
    println!("SELECT params: {:?}", built.values);

    // INSERT several rows
    let insert_query = insert()
        .into_table("users")
        .values([
            Fields::new().with("name", "John Doe").with("age", 30),
            Fields::new().with("name", "Jane Doe").with("age", 28),
        ])?
        .returning("id")
        .build()?;
    println!("INSERT SQL: {}", insert_query.text);

    // UPDATE
    let update_query = update("users")
        .set(Fields::new().with("email", "newemail@example.com"))?
        .where_(Fields::new().with("id", 123).with("active", true))
        .build()?;
    println!("UPDATE SQL: {}", update_query.text);

    // DELETE
    let delete_query = delete_from("users")
        .where_(and([gt("age", 99), is_null("last_login")]))
        .build()?;
    println!("DELETE SQL: {}", delete_query.text);

    // The same statement for a MySQL driver
    let mysql = Dialect {
        placeholder: PlaceholderStyle::Question,
        quote_char: Some('`'),
        bind_limits: false,
    };
    println!("MySQL SQL: {}", users.build_with(&mysql)?.text);

    // Change the process-wide default
    brickwork_core::set_option("placeholder", ":1")?;
    println!("Oracle SQL: {}", select_all().from("dual").where_(("x", 1)).build()?.text);

    Ok(())
}
